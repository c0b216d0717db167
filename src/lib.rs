//! Bindings for the trigger-to-entity autocomplete engine.

uniffi::setup_scaffolding!();

pub mod api;
pub mod trace_init;

pub use tag_core::settings;
