//! UniFFI export layer for hosts embedding the autocomplete engine.
//!
//! Each public type here maps to a generated foreign class, struct, or enum.
//! Documents cross the boundary as JSON strings.

mod engine;
mod session;
mod types;


pub use engine::TagEngine;
pub use session::TagSession;
pub use types::{
    TagCandidate, TagChooseResult, TagEntry, TagError, TagEvent, TagFragment, TagResponse,
    TagSelection, TagSpan,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), TagError> {
    let content = std::fs::read_to_string(&path).map_err(|e| TagError::Io {
        msg: format!("{path}: {e}"),
    })?;
    crate::settings::init_custom(content)
        .map_err(|e| TagError::InvalidData { msg: e.to_string() })?;
    tracing::debug!(%path, "custom settings installed");
    Ok(())
}

#[uniffi::export]
fn settings_default_config() -> String {
    crate::settings::DEFAULT_SETTINGS_TOML.to_string()
}

#[uniffi::export]
fn plain_document(text: String) -> String {
    types::document_to_json(&tag_core::Document::from_plain_text(&text))
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
