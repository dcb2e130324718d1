use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docsearch_core::{search, Index};

#[path = "../tests/common/mod.rs"]
mod common;

fn corpus() -> Index {
    let words = ["kernel", "cache", "template", "operator", "cluster", "siteaccess", "override", "extension", "workflow", "database"];
    let mut builder = common::ArtifactBuilder::new();
    for i in 0..2_000 {
        let title = format!("{} {}", words[i % words.len()], words[(i / 3) % words.len()]);
        let text = (0..40).map(|j| words[(i * 7 + j * 3) % words.len()]).collect::<Vec<_>>().join(" ");
        builder = builder.doc(&format!("https://docs.example.com/{i}"), &title, &text);
    }
    Index::from_artifact(builder.build()).expect("valid artifact")
}

fn bench_search(c: &mut Criterion) {
    let index = corpus();
    c.bench_function("search_two_terms", |b| b.iter(|| search(&index, black_box("template cache"))));
    c.bench_function("search_prefix", |b| b.iter(|| search(&index, black_box("ext* -cluster"))));
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
