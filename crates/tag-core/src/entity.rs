//! Immutable, identity-bearing entities bound to text ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque entity identity, unique within a document lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(u64);

impl EntityKey {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Entities can only be created, never edited. The single variant keeps the
/// mutability visible in serialized documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    #[default]
    Immutable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionData {
    pub user_id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    pub tag_id: String,
    pub title: String,
    /// Host-defined tag category (e.g. "private").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_type: Option<String>,
}

/// Payload of an entity. The variant determines the entity's type, so a
/// type tag and a payload shape can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityData {
    Link(LinkData),
    Mention(MentionData),
    Tag(TagData),
    /// Host-registered kind with a free-form JSON payload.
    Custom {
        kind: String,
        #[serde(default)]
        data: serde_json::Value,
    },
}

impl EntityData {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Link(_) => EntityType::Link,
            Self::Mention(_) => EntityType::Mention,
            Self::Tag(_) => EntityType::Tag,
            Self::Custom { kind, .. } => EntityType::Custom(kind.clone()),
        }
    }
}

/// Dispatch key for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityType {
    Link,
    Mention,
    Tag,
    Custom(String),
}

impl EntityType {
    /// Parse a type tag. The built-in names are case-insensitive; anything
    /// else is a custom kind, kept verbatim.
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "LINK" => Self::Link,
            "MENTION" => Self::Mention,
            "TAG" => Self::Tag,
            _ => Self::Custom(tag.to_string()),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => f.write_str("LINK"),
            Self::Mention => f.write_str("MENTION"),
            Self::Tag => f.write_str("TAG"),
            Self::Custom(kind) => f.write_str(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    key: EntityKey,
    data: EntityData,
    #[serde(default)]
    mutability: Mutability,
}

impl Entity {
    pub(crate) fn new(key: EntityKey, data: EntityData) -> Self {
        Self {
            key,
            data,
            mutability: Mutability::Immutable,
        }
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    pub fn entity_type(&self) -> EntityType {
        self.data.entity_type()
    }

    pub fn mutability(&self) -> Mutability {
        self.mutability
    }
}
