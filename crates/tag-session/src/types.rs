use tag_core::settings::Settings;
use tag_core::{BlockKey, Candidate, Document, EntityKey, FilterOptions, Selection, SubstituteError, TriggerSpan};

pub(super) const DEFAULT_TRIGGER: char = '#';
pub(super) const MAX_CANDIDATES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub trigger: char,
    pub match_case: bool,
    pub max_results: usize,
}

impl SessionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            trigger: settings.trigger.char,
            match_case: settings.filter.match_case,
            max_results: settings.filter.max_results,
        }
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            match_case: self.match_case,
            max_results: self.max_results,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trigger: DEFAULT_TRIGGER,
            match_case: true,
            max_results: MAX_CANDIDATES,
        }
    }
}

/// Host notifications that drive the state machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The document was edited; `selection` is the caret after the edit.
    DocumentChanged {
        document: Document,
        selection: Selection,
    },
    /// The caret moved without an edit.
    SelectionChanged(Selection),
}

impl SessionEvent {
    pub(super) fn name(&self) -> &'static str {
        match self {
            Self::DocumentChanged { .. } => "document_changed",
            Self::SelectionChanged(_) => "selection_changed",
        }
    }
}

pub(super) enum SessionState {
    Idle,
    TokenActive(ActiveToken),
}

/// The token under the caret with its filtered candidates.
pub(super) struct ActiveToken {
    pub(super) span: TriggerSpan,
    pub(super) query: String,
    pub(super) matches: Vec<Candidate>,
    pub(super) selected: usize,
}

/// A token the user closed, remembered with the query typed at the time.
pub(super) struct DismissedToken {
    pub(super) block: BlockKey,
    pub(super) anchor: usize,
    pub(super) query: String,
}

impl DismissedToken {
    /// `span` is the same token, extended from where it was dismissed.
    pub(super) fn covers(&self, span: &TriggerSpan, query: Option<&str>) -> bool {
        span.block == self.block
            && span.anchor == self.anchor
            && query.is_some_and(|q| q.starts_with(&self.query))
    }
}

/// What the host should do with its dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    /// Leave the dropdown as-is.
    Keep,
    /// Show or update the dropdown with these candidates.
    Show {
        values: Vec<String>,
        labels: Vec<String>,
        selected: usize,
    },
    /// Hide the dropdown.
    Hide,
}

/// Response to a host event, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub candidates: CandidateAction,
    /// The active token's text, if a token is active.
    pub query: Option<String>,
}

impl CandidateAction {
    pub(super) fn show(matches: &[Candidate], selected: usize) -> Self {
        Self::Show {
            values: matches.iter().map(|c| c.value.clone()).collect(),
            labels: matches.iter().map(|c| c.text.clone()).collect(),
            selected,
        }
    }
}

/// A committed candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ChooseOutcome {
    pub document: Document,
    /// Collapsed caret right after the inserted entity text.
    pub selection: Selection,
    pub entity: EntityKey,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no active trigger token at the caret")]
    NoActiveToken,
    #[error("unknown candidate '{0}'")]
    UnknownCandidate(String),
    #[error("candidate '{0}' could not be resolved to an entity")]
    Unresolved(String),
    #[error(transparent)]
    Substitute(#[from] SubstituteError),
}

pub(super) fn cyclic_index(current: usize, delta: i32, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let c = current as i64;
    let n = count as i64;
    (c + delta as i64).rem_euclid(n) as usize
}
