mod scenario;

use crate::document::{BlockKey, Document};
use crate::entity::{EntityData, TagData};

pub(super) fn b0() -> BlockKey {
    BlockKey::new("b0")
}

pub(super) fn tag(id: &str) -> EntityData {
    EntityData::Tag(TagData {
        tag_id: id.to_string(),
        title: format!("tag_{id}"),
        tag_type: Some("private".to_string()),
    })
}

/// Panics unless every block's ranges are sorted, non-empty, in bounds and
/// pairwise non-overlapping, and each refers to a known entity.
pub(super) fn assert_well_formed(doc: &Document) {
    for block in doc.blocks() {
        let len = block.char_len();
        let mut prev_end = 0;
        for r in block.entity_ranges() {
            assert!(r.start < r.end, "empty range {r:?} in {}", block.key());
            assert!(r.end <= len, "range {r:?} past end ({len}) in {}", block.key());
            assert!(r.start >= prev_end, "overlap at {r:?} in {}", block.key());
            assert!(doc.entity(r.entity).is_some(), "dangling {r:?}");
            prev_end = r.end;
        }
    }
}
