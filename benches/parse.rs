use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use saxtree::parse_str;

const SIMPLE_XML: &str = "<root><child>text</child></root>";
const ATTR_XML: &str = "<root id=\"1\" name='test'><item value=\"42\" /></root>";

fn wide_document() -> String {
    let mut doc = String::from("<definitions>");
    for i in 0..200 {
        doc.push_str(&format!("<task id=\"t{i}\" name=\"task {i}\"><doc>step {i}</doc></task>"));
    }
    doc.push_str("</definitions>");
    doc
}

fn bench_simple(c: &mut Criterion) {
    c.bench_function("saxtree_simple", |b| {
        b.iter(|| parse_str(black_box(SIMPLE_XML)))
    });
}

fn bench_attr(c: &mut Criterion) {
    c.bench_function("saxtree_attr", |b| {
        b.iter(|| parse_str(black_box(ATTR_XML)))
    });
}

fn bench_wide(c: &mut Criterion) {
    let doc = wide_document();
    c.bench_function("saxtree_wide_200", |b| {
        b.iter(|| parse_str(black_box(&doc)))
    });
}

criterion_group!(benches, bench_simple, bench_attr, bench_wide);
criterion_main!(benches);
