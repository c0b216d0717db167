
use tag_core::{Selection, TagData};

use super::resolver::{TagCatalog, TagRecord};
use super::{AutocompleteSession, SessionConfig, SessionEvent, SessionResponse};

pub(super) fn make_test_catalog() -> TagCatalog {
    let mut catalog = TagCatalog::new();
    for (id, kind, title) in [
        ("aaa", "private", "tag_aaa"),
        ("aab", "private", "tag_aab"),
        ("abc", "public", "Project ABC"),
        ("bcd", "public", "tag_bcd"),
    ] {
        catalog.insert(TagRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
        });
    }
    catalog
}

pub(super) fn make_session() -> (AutocompleteSession, TagCatalog) {
    let catalog = make_test_catalog();
    let session = AutocompleteSession::new(SessionConfig::default(), catalog.candidates());
    (session, catalog)
}

/// Insert `text` at the caret, as an editor would, and report it.
pub(super) fn type_str(session: &mut AutocompleteSession, text: &str) -> SessionResponse {
    let sel = session.selection().clone();
    let document = session
        .document()
        .insert_text(&sel.block, sel.focus, text)
        .unwrap();
    let selection = Selection::collapsed(sel.block, sel.focus + text.chars().count());
    session.handle_event(SessionEvent::DocumentChanged {
        document,
        selection,
    })
}

/// Delete the char before the caret.
pub(super) fn backspace(session: &mut AutocompleteSession) -> SessionResponse {
    let sel = session.selection().clone();
    if sel.focus == 0 {
        return session.handle_event(SessionEvent::SelectionChanged(sel));
    }
    let document = session
        .document()
        .delete_range(&sel.block, sel.focus - 1, sel.focus)
        .unwrap();
    let selection = Selection::collapsed(sel.block, sel.focus - 1);
    session.handle_event(SessionEvent::DocumentChanged {
        document,
        selection,
    })
}

pub(super) fn move_caret(session: &mut AutocompleteSession, offset: usize) -> SessionResponse {
    let block = session.selection().block.clone();
    session.handle_event(SessionEvent::SelectionChanged(Selection::collapsed(
        block, offset,
    )))
}

pub(super) fn tag(id: &str, kind: &str, title: &str) -> TagData {
    TagData {
        tag_id: id.to_string(),
        title: title.to_string(),
        tag_type: Some(kind.to_string()),
    }
}
