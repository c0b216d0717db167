//! Entity rendering: a registry from entity type to a pure renderer.
//!
//! Rendering never touches the document. For a block, entity ranges are
//! visited in ascending order; ranges never overlap, so a block renders in a
//! single linear pass.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::{debug, debug_span};
use url::Url;

use crate::document::{BlockKey, Document};
use crate::entity::{Entity, EntityData, EntityType};

/// Display fragment produced for a span of block text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    /// Undecorated text.
    Text { text: String },
    /// Hyperlink. `new_context` asks the host to open it outside the app.
    Anchor {
        href: String,
        label: String,
        new_context: bool,
    },
    /// Visually distinct link, e.g. a user mention.
    Badge { href: String, label: String },
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Escaped HTML for hosts that want a markup string.
    pub fn to_html(&self) -> String {
        match self {
            Self::Text { text } => escape_html(text),
            Self::Anchor {
                href,
                label,
                new_context,
            } => {
                let mut out = format!("<a href=\"{}\"", escape_html(href));
                if *new_context {
                    out.push_str(" target=\"_blank\"");
                }
                let _ = write!(out, ">{}</a>", escape_html(label));
                out
            }
            Self::Badge { href, label } => format!(
                "<a href=\"{}\" style=\"{BADGE_STYLE}\"><span>{}</span></a>",
                escape_html(href),
                escape_html(label),
            ),
        }
    }
}

const BADGE_STYLE: &str = "background:#eee;color:black;padding:2px 6px;border-radius:8px";

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Pure function from an entity (and its display text) to a fragment.
pub trait Renderer: Send + Sync {
    fn render(&self, entity: &Entity, text: &str) -> Fragment;
}

impl<F> Renderer for F
where
    F: Fn(&Entity, &str) -> Fragment + Send + Sync,
{
    fn render(&self, entity: &Entity, text: &str) -> Fragment {
        self(entity, text)
    }
}

/// Renders `link` entities; off-origin URLs open in a new context.
pub struct LinkRenderer {
    host: url::Origin,
}

impl LinkRenderer {
    pub fn new(host_origin: &Url) -> Self {
        Self {
            host: host_origin.origin(),
        }
    }

    fn is_same_origin(&self, href: &str) -> bool {
        Url::parse(href).is_ok_and(|u| u.origin() == self.host)
    }
}

impl Renderer for LinkRenderer {
    fn render(&self, entity: &Entity, text: &str) -> Fragment {
        let EntityData::Link(link) = entity.data() else {
            return Fragment::text(text);
        };
        Fragment::Anchor {
            href: link.url.clone(),
            label: link.url.clone(),
            new_context: !self.is_same_origin(&link.url),
        }
    }
}

/// Renders `mention` entities as a badge linking to the user's path.
pub struct MentionRenderer {
    base: String,
}

impl MentionRenderer {
    pub fn new(host_origin: &Url) -> Self {
        Self {
            base: host_origin.origin().ascii_serialization(),
        }
    }
}

impl Renderer for MentionRenderer {
    fn render(&self, entity: &Entity, text: &str) -> Fragment {
        let EntityData::Mention(mention) = entity.data() else {
            return Fragment::text(text);
        };
        Fragment::Badge {
            href: format!("{}/{}", self.base, mention.user_id),
            label: mention.display_name.clone(),
        }
    }
}

/// Renders `tag` entities as a plain anchor to the tag's path.
pub struct TagRenderer {
    base: String,
}

impl TagRenderer {
    pub fn new(host_origin: &Url) -> Self {
        Self {
            base: host_origin.origin().ascii_serialization(),
        }
    }
}

impl Renderer for TagRenderer {
    fn render(&self, entity: &Entity, text: &str) -> Fragment {
        let EntityData::Tag(tag) = entity.data() else {
            return Fragment::text(text);
        };
        Fragment::Anchor {
            href: format!("{}/{}", self.base, tag.tag_id),
            label: tag.title.clone(),
            new_context: false,
        }
    }
}

#[derive(Default)]
pub struct RenderRegistry {
    renderers: HashMap<EntityType, Box<dyn Renderer>>,
}

impl RenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the link, mention and tag renderers for `host_origin`.
    pub fn with_builtins(host_origin: &Url) -> Self {
        let mut registry = Self::new();
        registry.register(EntityType::Link, LinkRenderer::new(host_origin));
        registry.register(EntityType::Mention, MentionRenderer::new(host_origin));
        registry.register(EntityType::Tag, TagRenderer::new(host_origin));
        registry
    }

    /// Register `renderer` for `entity_type`, replacing any previous one.
    pub fn register(&mut self, entity_type: EntityType, renderer: impl Renderer + 'static) {
        self.renderers.insert(entity_type, Box::new(renderer));
    }

    pub fn is_registered(&self, entity_type: &EntityType) -> bool {
        self.renderers.contains_key(entity_type)
    }

    /// Render one entity. Unregistered types degrade to plain text.
    pub fn render_entity(&self, entity: &Entity, text: &str) -> Fragment {
        match self.renderers.get(&entity.entity_type()) {
            Some(renderer) => renderer.render(entity, text),
            None => {
                debug!(entity_type = %entity.entity_type(), "no renderer, plain text");
                Fragment::text(text)
            }
        }
    }

    /// Fragment for the entity range covering `offset`, or `None` when no
    /// entity range covers it.
    pub fn render_at(&self, document: &Document, block: &BlockKey, offset: usize) -> Option<Fragment> {
        let (range, entity) = document.entity_at(block, offset)?;
        let text = document.block(block)?.slice(range.start, range.end)?;
        Some(self.render_entity(entity, text))
    }

    /// The whole block as fragments: entity ranges rendered, the text between
    /// them as [`Fragment::Text`]. `None` if the block does not exist.
    pub fn render_block(&self, document: &Document, block: &BlockKey) -> Option<Vec<Fragment>> {
        let _span = debug_span!("render_block", %block).entered();

        let b = document.block(block)?;
        let mut fragments = Vec::with_capacity(b.entity_ranges().len() * 2 + 1);
        let mut cursor = 0;
        for range in b.entity_ranges() {
            if range.start > cursor {
                fragments.push(Fragment::text(b.slice(cursor, range.start)?));
            }
            let text = b.slice(range.start, range.end)?;
            let fragment = match document.entity(range.entity) {
                Some(entity) => self.render_entity(entity, text),
                None => Fragment::text(text),
            };
            fragments.push(fragment);
            cursor = range.end;
        }
        let len = b.char_len();
        if cursor < len {
            fragments.push(Fragment::text(b.slice(cursor, len)?));
        }
        Some(fragments)
    }
}

/// Concatenate fragments into one HTML string.
pub fn fragments_to_html(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::to_html).collect()
}
