use tag_core::{BlockKey, Candidate, Fragment, Selection, SubstituteError, TriggerSpan};
use tag_session::{CandidateAction, SessionError, SessionResponse, TagRecord};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TagError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    /// Re-derive the token from the latest document and retry.
    #[error("stale span: {msg}")]
    StaleSpan { msg: String },
    #[error("no active trigger token")]
    NoActiveToken,
}

impl From<SessionError> for TagError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NoActiveToken => Self::NoActiveToken,
            SessionError::Substitute(stale @ SubstituteError::StaleSpan { .. }) => {
                Self::StaleSpan {
                    msg: stale.to_string(),
                }
            }
            other => Self::InvalidData {
                msg: other.to_string(),
            },
        }
    }
}

pub(super) fn parse_document(json: &str) -> Result<tag_core::Document, TagError> {
    serde_json::from_str(json).map_err(|e| TagError::InvalidData { msg: e.to_string() })
}

pub(super) fn document_to_json(document: &tag_core::Document) -> String {
    serde_json::to_string(document).expect("JSON serialization failed")
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct TagCandidate {
    pub value: String,
    pub text: String,
    pub keywords: Vec<String>,
}

impl From<TagCandidate> for Candidate {
    fn from(c: TagCandidate) -> Self {
        Self {
            value: c.value,
            text: c.text,
            keywords: c.keywords,
        }
    }
}

impl From<&Candidate> for TagCandidate {
    fn from(c: &Candidate) -> Self {
        Self {
            value: c.value.clone(),
            text: c.text.clone(),
            keywords: c.keywords.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct TagEntry {
    pub id: String,
    pub kind: String,
    pub title: String,
}

impl From<TagEntry> for TagRecord {
    fn from(t: TagEntry) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            title: t.title,
        }
    }
}

/// Char offsets within one block.
#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct TagSelection {
    pub block: String,
    pub anchor: u32,
    pub focus: u32,
}

impl From<TagSelection> for Selection {
    fn from(s: TagSelection) -> Self {
        Selection::new(BlockKey::new(s.block), s.anchor as usize, s.focus as usize)
    }
}

impl From<&Selection> for TagSelection {
    fn from(s: &Selection) -> Self {
        Self {
            block: s.block.to_string(),
            anchor: s.anchor as u32,
            focus: s.focus as u32,
        }
    }
}

#[derive(Clone, Debug, PartialEq, uniffi::Record)]
pub struct TagSpan {
    pub block: String,
    pub anchor: u32,
    pub focus: u32,
    pub query: String,
}

impl TagSpan {
    pub(super) fn new(span: &TriggerSpan, document: &tag_core::Document) -> Self {
        Self {
            block: span.block.to_string(),
            anchor: span.anchor as u32,
            focus: span.focus as u32,
            query: span.query(document).unwrap_or_default().to_string(),
        }
    }
}

#[derive(uniffi::Record)]
pub struct TagChooseResult {
    pub document_json: String,
    pub selection: TagSelection,
    pub entity: u64,
}

/// Event-driven response from the session methods.
#[derive(uniffi::Record)]
pub struct TagResponse {
    pub events: Vec<TagEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum TagEvent {
    ShowCandidates {
        values: Vec<String>,
        labels: Vec<String>,
        selected: u32,
    },
    HideCandidates,
    SetQuery {
        query: String,
    },
    ClearQuery,
}

#[derive(Clone, Debug, PartialEq, uniffi::Enum)]
pub enum TagFragment {
    Text {
        text: String,
    },
    Anchor {
        href: String,
        label: String,
        new_context: bool,
    },
    Badge {
        href: String,
        label: String,
    },
}

impl From<Fragment> for TagFragment {
    fn from(f: Fragment) -> Self {
        match f {
            Fragment::Text { text } => Self::Text { text },
            Fragment::Anchor {
                href,
                label,
                new_context,
            } => Self::Anchor {
                href,
                label,
                new_context,
            },
            Fragment::Badge { href, label } => Self::Badge { href, label },
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub(super) fn convert_to_events(resp: SessionResponse) -> TagResponse {
    let mut events = Vec::new();

    // 1. Token
    match resp.query {
        Some(query) => events.push(TagEvent::SetQuery { query }),
        None => events.push(TagEvent::ClearQuery),
    }

    // 2. Candidates
    match resp.candidates {
        CandidateAction::Show {
            values,
            labels,
            selected,
        } => events.push(TagEvent::ShowCandidates {
            values,
            labels,
            selected: selected as u32,
        }),
        CandidateAction::Hide => events.push(TagEvent::HideCandidates),
        CandidateAction::Keep => {}
    }

    TagResponse { events }
}
