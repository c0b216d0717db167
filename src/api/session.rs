use std::sync::{Arc, Mutex};

use tag_core::{Candidate, Selection};
use tag_session::{AutocompleteSession, SessionConfig, SessionEvent, TagCatalog};

use super::types::{convert_to_events, document_to_json, parse_document};
use super::{TagCandidate, TagChooseResult, TagEntry, TagError, TagResponse, TagSelection};

struct SessionInner {
    session: AutocompleteSession,
    catalog: TagCatalog,
}

#[derive(uniffi::Object)]
pub struct TagSession {
    inner: Mutex<SessionInner>,
}

#[uniffi::export]
impl TagSession {
    pub fn document_changed(
        &self,
        document_json: String,
        selection: TagSelection,
    ) -> Result<TagResponse, TagError> {
        let document = parse_document(&document_json)?;
        let mut inner = self.inner.lock().unwrap();
        let resp = inner.session.handle_event(SessionEvent::DocumentChanged {
            document,
            selection: Selection::from(selection),
        });
        Ok(convert_to_events(resp))
    }

    pub fn selection_changed(&self, selection: TagSelection) -> TagResponse {
        let mut inner = self.inner.lock().unwrap();
        let resp = inner
            .session
            .handle_event(SessionEvent::SelectionChanged(Selection::from(selection)));
        convert_to_events(resp)
    }

    /// Replace the tag catalog; its tags become the candidate list.
    pub fn set_tags(&self, tags: Vec<TagEntry>) -> TagResponse {
        let mut catalog = TagCatalog::new();
        for tag in tags {
            catalog.insert(tag.into());
        }
        let mut inner = self.inner.lock().unwrap();
        let resp = inner.session.set_candidates(catalog.candidates());
        inner.catalog = catalog;
        convert_to_events(resp)
    }

    /// Replace the candidate list, keeping the catalog used to resolve them.
    pub fn set_candidates(&self, candidates: Vec<TagCandidate>) -> TagResponse {
        let list: Vec<Candidate> = candidates.into_iter().map(Candidate::from).collect();
        let resp = self.inner.lock().unwrap().session.set_candidates(list);
        convert_to_events(resp)
    }

    pub fn move_selection(&self, delta: i32) -> TagResponse {
        convert_to_events(self.inner.lock().unwrap().session.move_selection(delta))
    }

    pub fn dismiss(&self) -> TagResponse {
        convert_to_events(self.inner.lock().unwrap().session.dismiss())
    }

    pub fn choose(&self, value: String) -> Result<TagChooseResult, TagError> {
        let mut inner = self.inner.lock().unwrap();
        let SessionInner { session, catalog } = &mut *inner;
        let outcome = session.choose(&value, &*catalog)?;
        Ok(TagChooseResult {
            document_json: document_to_json(&outcome.document),
            selection: TagSelection::from(&outcome.selection),
            entity: outcome.entity.get(),
        })
    }

    pub fn choose_selected(&self) -> Result<TagChooseResult, TagError> {
        let mut inner = self.inner.lock().unwrap();
        let SessionInner { session, catalog } = &mut *inner;
        let outcome = session.choose_selected(&*catalog)?;
        Ok(TagChooseResult {
            document_json: document_to_json(&outcome.document),
            selection: TagSelection::from(&outcome.selection),
            entity: outcome.entity.get(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().session.is_active()
    }

    pub fn query(&self) -> Option<String> {
        self.inner.lock().unwrap().session.query().map(str::to_string)
    }

    pub fn document_json(&self) -> String {
        document_to_json(self.inner.lock().unwrap().session.document())
    }

    /// Keys of entities inserted since the last call.
    pub fn take_inserted(&self) -> Vec<u64> {
        let mut inner = self.inner.lock().unwrap();
        inner.session.take_inserted().into_iter().map(|k| k.get()).collect()
    }
}

impl TagSession {
    pub(super) fn new(config: SessionConfig) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(SessionInner {
                session: AutocompleteSession::new(config, Vec::<Candidate>::new()),
                catalog: TagCatalog::new(),
            }),
        })
    }
}
