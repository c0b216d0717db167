//! End-to-end flow over the pure operations: scan, filter, substitute, render.

use url::Url;

use super::{assert_well_formed, b0, tag};
use crate::candidates::{filter_candidates, Candidate, FilterOptions};
use crate::document::{Document, Selection};
use crate::render::{fragments_to_html, Fragment, RenderRegistry};
use crate::substitute::{substitute, SubstituteError};
use crate::trigger::find_trigger_span;

fn registry() -> RenderRegistry {
    RenderRegistry::with_builtins(&Url::parse("http://localhost").unwrap())
}

#[test]
fn test_type_filter_choose_render() {
    let candidates = vec![Candidate::new("aaa", "aaa", &["aaa"])];
    let doc = Document::from_plain_text("hello #aa");

    let span = find_trigger_span(&doc, &Selection::collapsed(b0(), 9), '#').unwrap();
    let query = span.query(&doc);
    assert_eq!(query, Some("aa"));

    let matches = filter_candidates(&candidates, query, &FilterOptions::default());
    assert_eq!(matches.len(), 1);
    let chosen = matches[0];

    let sub = substitute(&doc, &span, tag(&chosen.value), "#tag_aaa").unwrap();
    assert_eq!(sub.document.block_text(&b0()), Some("hello #tag_aaa"));
    assert_eq!(sub.selection, Selection::collapsed(b0(), 14));
    assert_well_formed(&sub.document);

    let registry = registry();
    assert_eq!(
        registry.render_at(&sub.document, &b0(), 6),
        Some(Fragment::Anchor {
            href: "http://localhost/aaa".into(),
            label: "tag_aaa".into(),
            new_context: false,
        })
    );
    // Last char of the entity still renders it, the caret position does not
    assert!(registry.render_at(&sub.document, &b0(), 13).is_some());
    assert_eq!(registry.render_at(&sub.document, &b0(), 14), None);
    assert_eq!(registry.render_at(&sub.document, &b0(), 0), None);
}

#[test]
fn test_render_block_linear_pass() {
    let doc = Document::from_plain_text("see #a and #b!");
    let s1 = substitute(
        &doc,
        &find_trigger_span(&doc, &Selection::collapsed(b0(), 6), '#').unwrap(),
        tag("a"),
        "#tag_a",
    )
    .unwrap();
    // "see #tag_a and #b!"
    let s2 = substitute(
        &s1.document,
        &find_trigger_span(&s1.document, &Selection::collapsed(b0(), 17), '#').unwrap(),
        tag("b"),
        "#tag_b",
    )
    .unwrap();
    assert_eq!(s2.document.block_text(&b0()), Some("see #tag_a and #tag_b!"));

    let fragments = registry().render_block(&s2.document, &b0()).unwrap();
    assert_eq!(fragments.len(), 5);
    assert_eq!(fragments[0], Fragment::text("see "));
    assert_eq!(fragments[2], Fragment::text(" and "));
    assert_eq!(fragments[4], Fragment::text("!"));
    assert_eq!(
        fragments_to_html(&fragments),
        "see <a href=\"http://localhost/a\">tag_a</a> and <a href=\"http://localhost/b\">tag_b</a>!"
    );
}

#[test]
fn test_render_is_idempotent() {
    let doc = Document::from_plain_text("#x");
    let sub = substitute(
        &doc,
        &find_trigger_span(&doc, &Selection::collapsed(b0(), 2), '#').unwrap(),
        tag("x"),
        "#tag_x",
    )
    .unwrap();
    let registry = registry();
    let first = registry.render_block(&sub.document, &b0());
    let second = registry.render_block(&sub.document, &b0());
    assert_eq!(first, second);
    assert_eq!(sub.document.block_text(&b0()), Some("#tag_x"));
}

#[test]
fn test_render_missing_block() {
    let doc = Document::new();
    assert_eq!(registry().render_block(&doc, &"nope".into()), None);
    assert_eq!(registry().render_block(&doc, &b0()), Some(Vec::new()));
}

#[test]
fn test_stale_span_after_caret_moves_and_text_changes() {
    let doc = Document::from_plain_text("#ab");
    let span = find_trigger_span(&doc, &Selection::collapsed(b0(), 3), '#').unwrap();
    // Host deletes the trigger before the user picks a candidate
    let edited = doc.delete_range(&b0(), 0, 1).unwrap();
    let err = substitute(&edited, &span, tag("a"), "#tag_a").unwrap_err();
    assert!(matches!(err, SubstituteError::StaleSpan { .. }));
    assert_eq!(edited.block_text(&b0()), Some("ab"));
}

#[test]
fn test_trigger_inside_entity_text_is_stale() {
    let doc = Document::from_plain_text("#a");
    let sub = substitute(
        &doc,
        &find_trigger_span(&doc, &Selection::collapsed(b0(), 2), '#').unwrap(),
        tag("a"),
        "#tag_a",
    )
    .unwrap();
    // The caret right after the entity still scans back to its "#"
    let span = find_trigger_span(&sub.document, &sub.selection, '#').unwrap();
    assert_eq!(span.anchor, 0);
    let err = substitute(&sub.document, &span, tag("b"), "#tag_b").unwrap_err();
    assert!(matches!(err, SubstituteError::StaleSpan { .. }));
}

#[test]
fn test_multi_block_substitution_leaves_other_blocks() {
    let doc = Document::from_plain_text("first #f\nsecond #s");
    let b1 = "b1".into();
    let span = find_trigger_span(&doc, &Selection::collapsed(b1, 9), '#').unwrap();
    let sub = substitute(&doc, &span, tag("s"), "#tag_s").unwrap();
    assert_eq!(sub.document.block_text(&b0()), Some("first #f"));
    assert_eq!(sub.document.block_text(&"b1".into()), Some("second #tag_s"));
    assert!(sub.document.block(&b0()).unwrap().entity_ranges().is_empty());
}
