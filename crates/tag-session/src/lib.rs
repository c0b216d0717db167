//! Stateful autocomplete session tracking the trigger token under the caret.
//!
//! `AutocompleteSession` owns the latest document snapshot and selection. The
//! host reports edits and caret moves as events; each response tells the host
//! whether to show, update or hide its candidate dropdown.

pub(crate) mod types;

mod choose;
mod events;
mod resolver;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tag_core::{BlockKey, Candidate, Document, EntityKey, Selection};

pub use resolver::{EntityResolver, ResolvedEntity, TagCatalog, TagRecord};
pub use types::{
    CandidateAction, ChooseOutcome, SessionConfig, SessionError, SessionEvent, SessionResponse,
};

use types::{DismissedToken, SessionState};

pub struct AutocompleteSession {
    config: SessionConfig,
    candidates: Arc<[Candidate]>,

    document: Document,
    selection: Selection,
    state: SessionState,
    /// Token dismissed by the user; stays closed while it is only extended.
    dismissed: Option<DismissedToken>,

    // Entities inserted since the last `take_inserted`
    inserted: Vec<EntityKey>,
}

impl AutocompleteSession {
    pub fn new(config: SessionConfig, candidates: impl Into<Arc<[Candidate]>>) -> Self {
        let document = Document::new();
        let selection = match document.first_block() {
            Some(b) => Selection::collapsed(b.key().clone(), 0),
            None => Selection::collapsed(BlockKey::new("b0"), 0),
        };
        Self {
            config,
            candidates: candidates.into(),
            document,
            selection,
            state: SessionState::Idle,
            dismissed: None,
            inserted: Vec::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::TokenActive(_))
    }

    /// Text typed after the trigger, if a token is active.
    pub fn query(&self) -> Option<&str> {
        match &self.state {
            SessionState::TokenActive(t) => Some(&t.query),
            SessionState::Idle => None,
        }
    }

    /// Value of the highlighted candidate, if the dropdown has any.
    pub fn selected_value(&self) -> Option<&str> {
        match &self.state {
            SessionState::TokenActive(t) => t.matches.get(t.selected).map(|c| c.value.as_str()),
            SessionState::Idle => None,
        }
    }

    /// Take keys of entities inserted by `choose`, clearing the internal buffer.
    pub fn take_inserted(&mut self) -> Vec<EntityKey> {
        std::mem::take(&mut self.inserted)
    }
}
