//! Replace a trigger span with an immutable entity-backed span.

use tracing::{debug, debug_span};

use crate::document::{BlockKey, Document, Selection};
use crate::entity::{EntityData, EntityKey};
use crate::trigger::TriggerSpan;
use crate::unicode::{char_len, is_token_break};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstituteError {
    /// The span no longer describes a token in the current document.
    /// Re-derive it from the latest selection and retry.
    #[error("trigger span {anchor}..{focus} in block '{block}' is stale")]
    StaleSpan {
        block: BlockKey,
        anchor: usize,
        focus: usize,
    },
    #[error("range {start}..{end} partially overlaps entity {entity}")]
    OverlappingEntity {
        entity: EntityKey,
        start: usize,
        end: usize,
    },
    #[error("display text must not be empty")]
    EmptyDisplayText,
}

/// Result of a successful substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub document: Document,
    /// Collapsed caret right after the inserted entity text.
    pub selection: Selection,
    pub entity: EntityKey,
}

/// Replace `span` with `display_text` bound to a new entity carrying `data`.
///
/// The span is revalidated against `document`: the block must exist, the
/// offsets must fit, the trigger char must still open the span, and the token
/// must not contain a break or another trigger. The input snapshot is never
/// modified; on error nothing changes.
pub fn substitute(
    document: &Document,
    span: &TriggerSpan,
    data: EntityData,
    display_text: &str,
) -> Result<Substitution, SubstituteError> {
    let _span = debug_span!(
        "substitute",
        block = %span.block,
        anchor = span.anchor,
        focus = span.focus,
        entity_type = %data.entity_type(),
    )
    .entered();

    if display_text.is_empty() {
        return Err(SubstituteError::EmptyDisplayText);
    }
    let (start, end) = (span.anchor, span.focus);
    let stale = || SubstituteError::StaleSpan {
        block: span.block.clone(),
        anchor: start,
        focus: end,
    };

    let block = document.block(&span.block).ok_or_else(stale)?;
    if start >= end {
        return Err(stale());
    }
    let covered = block.slice(start, end).ok_or_else(stale)?;
    let mut chars = covered.chars();
    if chars.next() != Some(span.trigger) {
        return Err(stale());
    }
    if chars.any(|c| c == span.trigger || is_token_break(c)) {
        return Err(stale());
    }
    // A trigger char that is already part of an entity's display text is not
    // typed input.
    if block.range_at(start).is_some() {
        return Err(stale());
    }
    if let Some(r) = block
        .entity_ranges()
        .iter()
        .find(|r| r.intersects(start, end) && !r.is_within(start, end))
    {
        return Err(SubstituteError::OverlappingEntity {
            entity: r.entity,
            start,
            end,
        });
    }

    let mut next = document.clone();
    let entity = next.create_entity(data);
    let detached = next
        .block_mut(&span.block)
        .and_then(|b| b.splice(start, end, display_text, Some(entity)))
        .ok_or_else(stale)?;

    let caret = start + char_len(display_text);
    debug!(%entity, caret, replaced = detached.len(), "substituted");
    Ok(Substitution {
        document: next,
        selection: Selection::collapsed(span.block.clone(), caret),
        entity,
    })
}
