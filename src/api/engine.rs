use std::sync::Arc;

use url::Url;

use tag_core::{filter_candidates, find_trigger_span, BlockKey, Candidate, RenderRegistry, Selection};
use tag_session::SessionConfig;

use super::types::parse_document;
use super::{TagCandidate, TagError, TagFragment, TagSelection, TagSession, TagSpan};

#[derive(uniffi::Object)]
pub struct TagEngine {
    config: SessionConfig,
    registry: RenderRegistry,
}

#[uniffi::export]
impl TagEngine {
    /// Engine configured from the global settings.
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        let settings = crate::settings::settings();
        Arc::new(Self {
            config: SessionConfig::from_settings(settings),
            registry: RenderRegistry::with_builtins(&settings.render.origin),
        })
    }

    /// Engine whose renderers treat `origin` as the host application.
    #[uniffi::constructor]
    pub fn with_origin(origin: String) -> Result<Arc<Self>, TagError> {
        let url = Url::parse(&origin).map_err(|e| TagError::InvalidData {
            msg: format!("{origin}: {e}"),
        })?;
        if url.host_str().is_none() {
            return Err(TagError::InvalidData {
                msg: format!("{origin}: must be an absolute URL with a host"),
            });
        }
        Ok(Arc::new(Self {
            config: SessionConfig::from_settings(crate::settings::settings()),
            registry: RenderRegistry::with_builtins(&url),
        }))
    }

    pub fn create_session(&self) -> Arc<TagSession> {
        TagSession::new(self.config)
    }

    pub fn trigger(&self) -> String {
        self.config.trigger.to_string()
    }

    pub fn find_span(
        &self,
        document_json: String,
        selection: TagSelection,
    ) -> Result<Option<TagSpan>, TagError> {
        let document = parse_document(&document_json)?;
        let selection = Selection::from(selection);
        Ok(find_trigger_span(&document, &selection, self.config.trigger)
            .map(|span| TagSpan::new(&span, &document)))
    }

    pub fn filter(&self, candidates: Vec<TagCandidate>, query: String) -> Vec<TagCandidate> {
        let candidates: Vec<Candidate> = candidates.into_iter().map(Candidate::from).collect();
        filter_candidates(&candidates, Some(&query), &self.config.filter_options())
            .into_iter()
            .map(TagCandidate::from)
            .collect()
    }

    /// Fragments for one block; unknown blocks are an error.
    pub fn render_block(
        &self,
        document_json: String,
        block: String,
    ) -> Result<Vec<TagFragment>, TagError> {
        let document = parse_document(&document_json)?;
        let fragments = self
            .registry
            .render_block(&document, &BlockKey::new(block.as_str()))
            .ok_or_else(|| TagError::InvalidData {
                msg: format!("unknown block '{block}'"),
            })?;
        Ok(fragments.into_iter().map(TagFragment::from).collect())
    }

    /// One HTML string per block, in document order.
    pub fn render_html(&self, document_json: String) -> Result<Vec<String>, TagError> {
        let document = parse_document(&document_json)?;
        Ok(document
            .blocks()
            .filter_map(|b| self.registry.render_block(&document, b.key()))
            .map(|fragments| tag_core::fragments_to_html(&fragments))
            .collect())
    }
}
