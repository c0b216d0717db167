//! JSON input files for the CLI: candidate lists and document snapshots.

use std::fs;
use std::io;
use std::path::Path;

use tag_core::{Candidate, Document};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// A JSON array of `{ "value", "text", "keywords" }` objects.
pub fn load_candidates(path: &Path) -> Result<Vec<Candidate>, InputError> {
    load_json(path)
}

/// A serialized document; entity ranges are validated on load.
pub fn load_document(path: &Path) -> Result<Document, InputError> {
    load_json(path)
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| InputError::Json {
        path: path.display().to_string(),
        source,
    })
}
