//! Document model and pure operations behind trigger-to-entity autocomplete.
//!
//! Every operation works over immutable [`Document`] snapshots: scanning for
//! the token under the caret, filtering candidates, substituting the token
//! with an entity, and rendering entity ranges into display fragments.

pub mod candidates;
pub mod document;
pub mod entity;
pub mod render;
pub mod settings;
pub mod substitute;
pub mod trigger;
pub mod unicode;

#[cfg(test)]
mod tests;

pub use candidates::{filter_candidates, Candidate, FilterOptions};
pub use document::{Block, BlockKey, Document, DocumentError, EntityRange, Selection};
pub use entity::{Entity, EntityData, EntityKey, EntityType, LinkData, MentionData, Mutability, TagData};
pub use render::{fragments_to_html, Fragment, RenderRegistry, Renderer};
pub use substitute::{substitute, SubstituteError, Substitution};
pub use trigger::{find_trigger_span, TriggerSpan};
