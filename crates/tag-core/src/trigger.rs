//! Detect the in-progress trigger token under the caret.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::document::{BlockKey, Document, Selection};
use crate::unicode::{char_slice, is_token_break};

/// Range from the trigger char (`anchor`) to the caret (`focus`).
///
/// Derived on every caret move and never persisted. The trigger char is kept
/// so the span can be revalidated against a later snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpan {
    pub block: BlockKey,
    pub anchor: usize,
    pub focus: usize,
    pub trigger: char,
}

impl TriggerSpan {
    /// The typed token, i.e. the text between the trigger char and the caret.
    /// `None` if the span no longer fits the document.
    pub fn query<'a>(&self, document: &'a Document) -> Option<&'a str> {
        document
            .block(&self.block)?
            .slice(self.anchor + 1, self.focus)
    }

    /// Length of the token in chars (excludes the trigger char).
    pub fn token_len(&self) -> usize {
        self.focus.saturating_sub(self.anchor + 1)
    }
}

/// Find the trigger token ending at the caret.
///
/// Scans backward from the char before the caret. The nearest `trigger`
/// opens the span unless whitespace or the block start comes first. A
/// non-collapsed selection never denotes a token.
pub fn find_trigger_span(
    document: &Document,
    selection: &Selection,
    trigger: char,
) -> Option<TriggerSpan> {
    let _span = debug_span!("find_trigger_span", block = %selection.block, focus = selection.focus)
        .entered();

    if !selection.is_collapsed() {
        return None;
    }
    let block = document.block(&selection.block)?;
    let head = char_slice(block.text(), 0, selection.focus)?;

    let mut offset = selection.focus;
    for ch in head.chars().rev() {
        offset -= 1;
        if ch == trigger {
            debug!(anchor = offset, "trigger found");
            return Some(TriggerSpan {
                block: selection.block.clone(),
                anchor: offset,
                focus: selection.focus,
                trigger,
            });
        }
        if is_token_break(ch) {
            return None;
        }
    }
    None
}
