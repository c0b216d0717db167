use std::path::Path;
use std::process;

use tag_core::settings::Settings;
use tag_core::{fragments_to_html, Candidate, Document, EntityData, RenderRegistry, Selection, TagData};
use tag_session::{
    AutocompleteSession, CandidateAction, ChooseOutcome, ResolvedEntity, SessionConfig,
    SessionError, SessionEvent,
};

use super::scan_ops::document_with_caret;
use crate::input::{load_candidates, load_document};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Candidates resolve to tags: the value is the tag id, the text its title.
fn resolve_as_tag(candidate: &Candidate, trigger: char) -> Option<ResolvedEntity> {
    Some(ResolvedEntity {
        data: EntityData::Tag(TagData {
            tag_id: candidate.value.clone(),
            title: candidate.text.clone(),
            tag_type: None,
        }),
        display_text: format!("{trigger}{}", candidate.text),
    })
}

/// Run one session over `document`: derive the token at `selection`, then
/// commit `value`.
pub fn complete(
    settings: &Settings,
    document: Document,
    selection: Selection,
    candidates: Vec<Candidate>,
    value: &str,
) -> Result<(CandidateAction, ChooseOutcome), SessionError> {
    let mut session = AutocompleteSession::new(SessionConfig::from_settings(settings), candidates);
    let resp = session.handle_event(SessionEvent::DocumentChanged {
        document,
        selection,
    });
    let outcome = session.choose(value, &resolve_as_tag)?;
    Ok((resp.candidates, outcome))
}

/// One HTML line per block.
pub fn render_html_lines(document: &Document, registry: &RenderRegistry) -> Vec<String> {
    document
        .blocks()
        .filter_map(|b| registry.render_block(document, b.key()))
        .map(|fragments| fragments_to_html(&fragments))
        .collect()
}

pub fn complete_cmd(text: &str, candidates_file: &str, value: &str, caret: Option<usize>, json: bool) {
    let settings = tag_core::settings::settings();
    let candidates = die!(
        load_candidates(Path::new(candidates_file)),
        "Error loading candidates: {}"
    );
    let (doc, selection) = document_with_caret(text, caret);
    let (shown, outcome) = die!(
        complete(settings, doc, selection, candidates, value),
        "Error: {}"
    );

    if let CandidateAction::Show { values, .. } = &shown {
        println!("candidates: {}", values.join(", "));
    }
    if json {
        let out = serde_json::to_string_pretty(&outcome.document).expect("JSON serialization failed");
        println!("{out}");
        return;
    }
    println!("text:  {}", outcome.document.plain_text());
    println!("caret: {} {}", outcome.selection.block, outcome.selection.focus);
    for block in outcome.document.blocks() {
        for r in block.entity_ranges() {
            let kind = outcome
                .document
                .entity(r.entity)
                .map(|e| e.entity_type().to_string())
                .unwrap_or_default();
            println!("range: {} [{}, {}) {} {}", block.key(), r.start, r.end, r.entity, kind);
        }
    }
    let registry = RenderRegistry::with_builtins(&settings.render.origin);
    for line in render_html_lines(&outcome.document, &registry) {
        println!("html:  {line}");
    }
}

pub fn render_cmd(document_file: &str) {
    let doc = die!(
        load_document(Path::new(document_file)),
        "Error loading document: {}"
    );
    let registry = RenderRegistry::with_builtins(&tag_core::settings::settings().render.origin);
    for line in render_html_lines(&doc, &registry) {
        println!("{line}");
    }
}
