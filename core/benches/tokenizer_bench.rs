use criterion::{criterion_group, criterion_main, Criterion};
use docsearch_core::tokenizer::tokenize;

const SECTION: &str = "<p>The kernel reads its configuration from settings/site.ini and overrides it \
with siteaccess specific settings. Cache files are written below var/cache; clearing the \
template cache forces every template to be compiled again on the next request.</p>";

fn bench_tokenize(c: &mut Criterion) {
    let text = SECTION.repeat(50);
    c.bench_function("tokenize_section", |b| b.iter(|| tokenize(&text)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
