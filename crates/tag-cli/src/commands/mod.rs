pub mod complete_ops;
pub mod config_ops;
pub mod scan_ops;
