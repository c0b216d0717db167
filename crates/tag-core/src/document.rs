//! Immutable document snapshots: ordered blocks of text with entity ranges.
//!
//! A [`Document`] is never mutated in place by public API. Every edit returns
//! a new snapshot; unaffected blocks and the entity table are shared with the
//! previous one through `Arc`.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Entity, EntityData, EntityKey};
use crate::unicode::{byte_offset, char_len, char_slice};

/// Opaque block identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Half-open char range `[start, end)` bound to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRange {
    pub start: usize,
    pub end: usize,
    pub entity: EntityKey,
}

impl EntityRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True if `[start, end)` shares at least one char with this range, or is
    /// a zero-width position strictly inside it.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        if start == end {
            return self.start < start && start < self.end;
        }
        self.start < end && start < self.end
    }

    /// True if this range lies entirely inside `[start, end)`.
    pub fn is_within(&self, start: usize, end: usize) -> bool {
        start <= self.start && self.end <= end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    key: BlockKey,
    text: String,
    #[serde(default, rename = "entity_ranges")]
    ranges: Vec<EntityRange>,
}

impl Block {
    fn new(key: BlockKey, text: String) -> Self {
        Self {
            key,
            text,
            ranges: Vec::new(),
        }
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }

    /// Entity ranges in ascending offset order.
    pub fn entity_ranges(&self) -> &[EntityRange] {
        &self.ranges
    }

    /// The entity range covering the char at `offset`, if any.
    pub fn range_at(&self, offset: usize) -> Option<&EntityRange> {
        self.ranges.iter().find(|r| r.contains(offset))
    }

    /// Text of `[start, end)` in chars.
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        char_slice(&self.text, start, end)
    }

    /// Replace `[start, end)` with `text`. Ranges before the edit are kept,
    /// ranges after it shift, ranges the edit touches are detached (their
    /// text stays as plain text). With `attach`, the inserted text becomes a
    /// new range bound to that entity. Returns the detached keys, or `None`
    /// when the offsets do not fit the block.
    pub(crate) fn splice(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        attach: Option<EntityKey>,
    ) -> Option<Vec<EntityKey>> {
        if start > end {
            return None;
        }
        let from = byte_offset(&self.text, start)?;
        let to = byte_offset(&self.text, end)?;
        let inserted = char_len(text);
        self.text.replace_range(from..to, text);

        let mut detached = Vec::new();
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        for r in self.ranges.drain(..) {
            if r.end <= start {
                ranges.push(r);
            } else if r.start >= end {
                ranges.push(EntityRange {
                    start: r.start - end + start + inserted,
                    end: r.end - end + start + inserted,
                    entity: r.entity,
                });
            } else {
                detached.push(r.entity);
            }
        }
        if let Some(entity) = attach {
            if inserted > 0 {
                ranges.push(EntityRange {
                    start,
                    end: start + inserted,
                    entity,
                });
                ranges.sort_by_key(|r| r.start);
            }
        }
        self.ranges = ranges;
        Some(detached)
    }
}

/// Caret or selected range inside one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub block: BlockKey,
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub fn new(block: BlockKey, anchor: usize, focus: usize) -> Self {
        Self {
            block,
            anchor,
            focus,
        }
    }

    /// A caret (no selected text) at `offset`.
    pub fn collapsed(block: BlockKey, offset: usize) -> Self {
        Self::new(block, offset, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    /// Clamp both offsets into the block's bounds. `None` if the block is gone.
    pub fn clamp_to(&self, document: &Document) -> Option<Selection> {
        let len = document.block(&self.block)?.char_len();
        Some(Self::new(
            self.block.clone(),
            self.anchor.min(len),
            self.focus.min(len),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("unknown block '{0}'")]
    UnknownBlock(BlockKey),
    #[error("range {start}..{end} is outside block '{block}' (length {len})")]
    OutOfBounds {
        block: BlockKey,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("duplicate block key '{0}'")]
    DuplicateBlock(BlockKey),
    #[error("invalid entity range {start}..{end} in block '{block}': {reason}")]
    InvalidRange {
        block: BlockKey,
        start: usize,
        end: usize,
        reason: &'static str,
    },
    #[error("entity {0} is referenced but not defined")]
    UnknownEntity(EntityKey),
    #[error("duplicate entity key {0}")]
    DuplicateEntity(EntityKey),
}

/// Ordered sequence of blocks plus the entity table they reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRepr", into = "DocumentRepr")]
pub struct Document {
    blocks: Vec<Arc<Block>>,
    entities: Arc<BTreeMap<EntityKey, Arc<Entity>>>,
    next_entity: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with a single empty block `b0`.
    pub fn new() -> Self {
        Self::from_plain_text("")
    }

    /// One block per line. `\r\n` and lone `\r` count as line breaks.
    pub fn from_plain_text(text: &str) -> Self {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let blocks = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| Arc::new(Block::new(BlockKey::new(format!("b{i}")), line.to_string())))
            .collect();
        Self {
            blocks,
            entities: Arc::new(BTreeMap::new()),
            next_entity: 0,
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn first_block(&self) -> Option<&Block> {
        self.blocks.first().map(|b| b.as_ref())
    }

    pub fn block(&self, key: &BlockKey) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.key == key).map(|b| b.as_ref())
    }

    pub fn block_text(&self, key: &BlockKey) -> Option<&str> {
        self.block(key).map(Block::text)
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(&key).map(|e| e.as_ref())
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().map(|e| e.as_ref())
    }

    /// Entity range covering the char at `offset` in `block`, with its entity.
    pub fn entity_at(&self, block: &BlockKey, offset: usize) -> Option<(&EntityRange, &Entity)> {
        let range = self.block(block)?.range_at(offset)?;
        Some((range, self.entity(range.entity)?))
    }

    /// Block texts joined by `\n`.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True if the selection names an existing block and both offsets are in bounds.
    pub fn contains_selection(&self, selection: &Selection) -> bool {
        self.block(&selection.block)
            .is_some_and(|b| selection.end() <= b.char_len())
    }

    /// Append a block, returning the new snapshot and the new block's key.
    pub fn push_block(&self, text: &str) -> (Document, BlockKey) {
        let key = self.fresh_block_key();
        let mut next = self.clone();
        next.blocks
            .push(Arc::new(Block::new(key.clone(), text.to_string())));
        (next, key)
    }

    /// Replace chars `[start, end)` of `block` with `text`.
    ///
    /// Entity ranges the edit touches are detached: entities are immutable,
    /// so an edited range no longer represents its entity. The entity itself
    /// stays in the table.
    pub fn replace_text(
        &self,
        block: &BlockKey,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<Document, DocumentError> {
        let mut next = self.clone();
        let target = next
            .block_mut(block)
            .ok_or_else(|| DocumentError::UnknownBlock(block.clone()))?;
        let len = target.char_len();
        let detached = target
            .splice(start, end, text, None)
            .ok_or_else(|| DocumentError::OutOfBounds {
                block: block.clone(),
                start,
                end,
                len,
            })?;
        if !detached.is_empty() {
            debug!(block = %block, ?detached, "edit detached entity ranges");
        }
        Ok(next)
    }

    pub fn insert_text(
        &self,
        block: &BlockKey,
        offset: usize,
        text: &str,
    ) -> Result<Document, DocumentError> {
        self.replace_text(block, offset, offset, text)
    }

    pub fn delete_range(
        &self,
        block: &BlockKey,
        start: usize,
        end: usize,
    ) -> Result<Document, DocumentError> {
        self.replace_text(block, start, end, "")
    }

    /// Mint a fresh entity in this (already cloned) snapshot.
    pub(crate) fn create_entity(&mut self, data: EntityData) -> EntityKey {
        let key = EntityKey::new(self.next_entity);
        self.next_entity += 1;
        Arc::make_mut(&mut self.entities).insert(key, Arc::new(Entity::new(key, data)));
        key
    }

    pub(crate) fn block_mut(&mut self, key: &BlockKey) -> Option<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|b| &b.key == key)
            .map(Arc::make_mut)
    }

    fn fresh_block_key(&self) -> BlockKey {
        let mut n = self.blocks.len();
        loop {
            let key = BlockKey::new(format!("b{n}"));
            if self.block(&key).is_none() {
                return key;
            }
            n += 1;
        }
    }
}

/// Serialized form. Deserialization rebuilds and validates a [`Document`].
#[derive(Serialize, Deserialize)]
struct DocumentRepr {
    blocks: Vec<Block>,
    #[serde(default)]
    entities: Vec<Entity>,
}

impl From<Document> for DocumentRepr {
    fn from(doc: Document) -> Self {
        Self {
            blocks: doc.blocks.iter().map(|b| b.as_ref().clone()).collect(),
            entities: doc.entities.values().map(|e| e.as_ref().clone()).collect(),
        }
    }
}

impl TryFrom<DocumentRepr> for Document {
    type Error = DocumentError;

    fn try_from(repr: DocumentRepr) -> Result<Self, Self::Error> {
        let mut entities = BTreeMap::new();
        for entity in repr.entities {
            let key = entity.key();
            if entities.insert(key, Arc::new(entity)).is_some() {
                return Err(DocumentError::DuplicateEntity(key));
            }
        }

        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(repr.blocks.len());
        for mut block in repr.blocks {
            if !seen.insert(block.key.clone()) {
                return Err(DocumentError::DuplicateBlock(block.key));
            }
            block.ranges.sort_by_key(|r| r.start);
            validate_ranges(&block, &entities)?;
            blocks.push(Arc::new(block));
        }
        if blocks.is_empty() {
            blocks.push(Arc::new(Block::new(BlockKey::new("b0"), String::new())));
        }

        let next_entity = entities.keys().next_back().map_or(0, |k| k.get() + 1);
        Ok(Self {
            blocks,
            entities: Arc::new(entities),
            next_entity,
        })
    }
}

fn validate_ranges(
    block: &Block,
    entities: &BTreeMap<EntityKey, Arc<Entity>>,
) -> Result<(), DocumentError> {
    let len = block.char_len();
    let mut prev_end = 0;
    for r in &block.ranges {
        let invalid = |reason| DocumentError::InvalidRange {
            block: block.key.clone(),
            start: r.start,
            end: r.end,
            reason,
        };
        if r.is_empty() {
            return Err(invalid("empty range"));
        }
        if r.end > len {
            return Err(invalid("past end of text"));
        }
        if r.start < prev_end {
            return Err(invalid("overlaps previous range"));
        }
        if !entities.contains_key(&r.entity) {
            return Err(DocumentError::UnknownEntity(r.entity));
        }
        prev_end = r.end;
    }
    Ok(())
}
