use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tag_core::{
    filter_candidates, find_trigger_span, substitute, BlockKey, Candidate, Document, EntityData,
    FilterOptions, Selection, TagData,
};

fn bench_candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| Candidate {
            value: format!("tag{i}"),
            text: format!("Tag {i}"),
            keywords: vec![format!("tag{i}"), format!("alias{i}")],
        })
        .collect()
}

fn long_line(words: usize) -> String {
    let mut s = (0..words).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    s.push_str(" #tag12");
    s
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_trigger_span");
    for words in [10, 100, 1000] {
        let text = long_line(words);
        let doc = Document::from_plain_text(&text);
        let caret = Selection::collapsed(BlockKey::new("b0"), text.chars().count());
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| find_trigger_span(&doc, &caret, '#'))
        });
    }
    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_candidates");
    let opts = FilterOptions::default();
    for n in [100, 1000, 10_000] {
        let list = bench_candidates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| filter_candidates(&list, Some("tag12"), &opts))
        });
    }
    group.finish();
}

fn bench_substitute(c: &mut Criterion) {
    let text = long_line(1000);
    let doc = Document::from_plain_text(&text);
    let caret = Selection::collapsed(BlockKey::new("b0"), text.chars().count());
    let span = find_trigger_span(&doc, &caret, '#').expect("bench line ends in a token");
    let data = EntityData::Tag(TagData {
        tag_id: "tag12".into(),
        title: "Tag 12".into(),
        tag_type: None,
    });
    c.bench_function("substitute_1000_words", |b| {
        b.iter(|| substitute(&doc, &span, data.clone(), "#Tag12"))
    });
}

criterion_group!(benches, bench_scan, bench_filter, bench_substitute);
criterion_main!(benches);
