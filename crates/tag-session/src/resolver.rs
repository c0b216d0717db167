//! Mapping a chosen candidate to the entity that replaces the token.

use std::collections::BTreeMap;

use tag_core::{Candidate, EntityData, TagData};

/// Entity payload plus the text that will represent it in the block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub data: EntityData,
    pub display_text: String,
}

/// Host-supplied payload construction for a chosen candidate.
pub trait EntityResolver {
    fn resolve(&self, candidate: &Candidate, trigger: char) -> Option<ResolvedEntity>;
}

impl<F> EntityResolver for F
where
    F: Fn(&Candidate, char) -> Option<ResolvedEntity>,
{
    fn resolve(&self, candidate: &Candidate, trigger: char) -> Option<ResolvedEntity> {
        self(candidate, trigger)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub id: String,
    /// Tag category, e.g. "private".
    pub kind: String,
    pub title: String,
}

/// Known tags keyed by id. Resolves a candidate whose `value` is a tag id to
/// a tag entity displayed as the trigger followed by the title.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    tags: BTreeMap<String, TagRecord>,
}

impl TagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag. Returns `true` if the id was new.
    pub fn insert(&mut self, record: TagRecord) -> bool {
        self.tags.insert(record.id.clone(), record).is_none()
    }

    pub fn get(&self, id: &str) -> Option<&TagRecord> {
        self.tags.get(id)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// One candidate per tag, ordered by id; searchable by id and title.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.tags
            .values()
            .map(|t| Candidate {
                value: t.id.clone(),
                text: t.title.clone(),
                keywords: vec![t.id.clone(), t.title.clone()],
            })
            .collect()
    }
}

impl EntityResolver for TagCatalog {
    fn resolve(&self, candidate: &Candidate, trigger: char) -> Option<ResolvedEntity> {
        let tag = self.tags.get(&candidate.value)?;
        Some(ResolvedEntity {
            data: EntityData::Tag(TagData {
                tag_id: tag.id.clone(),
                title: tag.title.clone(),
                tag_type: Some(tag.kind.clone()),
            }),
            display_text: format!("{trigger}{}", tag.title),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TagCatalog {
        let mut c = TagCatalog::new();
        c.insert(TagRecord {
            id: "aaa".into(),
            kind: "private".into(),
            title: "tag_aaa".into(),
        });
        c
    }

    #[test]
    fn test_resolve_tag() {
        let resolved = catalog()
            .resolve(&Candidate::new("aaa", "aaa", &["aaa"]), '#')
            .unwrap();
        assert_eq!(resolved.display_text, "#tag_aaa");
        assert_eq!(
            resolved.data,
            EntityData::Tag(TagData {
                tag_id: "aaa".into(),
                title: "tag_aaa".into(),
                tag_type: Some("private".into()),
            })
        );
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(catalog()
            .resolve(&Candidate::new("zzz", "zzz", &["zzz"]), '#')
            .is_none());
    }

    #[test]
    fn test_insert_replaces() {
        let mut c = catalog();
        assert!(!c.insert(TagRecord {
            id: "aaa".into(),
            kind: "public".into(),
            title: "renamed".into(),
        }));
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("aaa").unwrap().title, "renamed");
    }

    #[test]
    fn test_candidates_from_catalog() {
        let mut c = catalog();
        c.insert(TagRecord {
            id: "000".into(),
            kind: "public".into(),
            title: "first".into(),
        });
        let list = c.candidates();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].value, "000");
        assert_eq!(list[1].keywords, vec!["aaa", "tag_aaa"]);
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |c: &Candidate, t: char| {
            Some(ResolvedEntity {
                data: EntityData::Custom {
                    kind: "emoji".into(),
                    data: Default::default(),
                },
                display_text: format!("{t}{}", c.text),
            })
        };
        let r = resolver
            .resolve(&Candidate::new("s", "smile", &["smile"]), ':')
            .unwrap();
        assert_eq!(r.display_text, ":smile");
    }
}
