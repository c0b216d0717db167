use std::path::Path;
use std::process;

use unicode_width::UnicodeWidthStr;

use tag_core::unicode::{char_len, char_slice};
use tag_core::{filter_candidates, find_trigger_span, Document, FilterOptions, Selection, TriggerSpan};

use crate::input::load_candidates;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Document from the command-line text with a caret in its last block,
/// at `caret` or the end of the line.
pub fn document_with_caret(text: &str, caret: Option<usize>) -> (Document, Selection) {
    let doc = Document::from_plain_text(text);
    let last = doc
        .blocks()
        .last()
        .map(|b| (b.key().clone(), b.char_len()));
    let (key, len) = last.unwrap_or_else(|| (tag_core::BlockKey::new("b0"), 0));
    let offset = caret.map_or(len, |c| c.min(len));
    (doc, Selection::collapsed(key, offset))
}

/// `line` with a `^` under char offset `caret`, padded by display width.
pub fn caret_marker(line: &str, caret: usize) -> String {
    let head = char_slice(line, 0, caret.min(char_len(line))).unwrap_or(line);
    format!("{line}\n{}^", " ".repeat(head.width()))
}

pub fn describe_span(document: &Document, span: &TriggerSpan) -> String {
    format!(
        "span {} [{}, {}) trigger {:?} query {:?}",
        span.block,
        span.anchor,
        span.focus,
        span.trigger,
        span.query(document).unwrap_or(""),
    )
}

pub fn scan_cmd(text: &str, caret: Option<usize>, trigger: Option<char>) {
    let trigger = trigger.unwrap_or(tag_core::settings::settings().trigger.char);
    let (doc, selection) = document_with_caret(text, caret);
    let line = doc.block_text(&selection.block).unwrap_or("");
    println!("{}", caret_marker(line, selection.focus));
    match find_trigger_span(&doc, &selection, trigger) {
        Some(span) => println!("{}", describe_span(&doc, &span)),
        None => println!("no trigger span at {}", selection.focus),
    }
}

pub fn filter_cmd(candidates_file: &str, query: &str, ignore_case: bool, limit: Option<usize>) {
    let candidates = die!(
        load_candidates(Path::new(candidates_file)),
        "Error loading candidates: {}"
    );
    let defaults = tag_core::settings::settings().filter_options();
    let options = FilterOptions {
        match_case: defaults.match_case && !ignore_case,
        max_results: limit.unwrap_or(defaults.max_results),
    };
    let matched = filter_candidates(&candidates, Some(query), &options);
    if matched.is_empty() {
        println!("no candidates match {query:?}");
        return;
    }
    for (i, c) in matched.iter().enumerate() {
        println!("#{:>2}: {}\t{}", i + 1, c.value, c.text);
    }
}
