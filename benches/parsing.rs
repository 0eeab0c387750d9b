//! Benchmarks for body text parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tabpress::body::{parse_body, serialize_body};
use tabpress::defaults::builtin_defaults;

fn bench_parse_simple(c: &mut Criterion) {
    let text = "We publish books.\n\n- Fiction\n- Poetry";
    c.bench_function("parse_simple", |b| b.iter(|| parse_body(black_box(text))));
}

fn bench_parse_long(c: &mut Criterion) {
    let paragraph = "Our editors work with debut and established authors alike. ";
    let text = (0..200)
        .map(|i| {
            if i % 4 == 0 {
                "- first item\n• second item\n-third item".to_string()
            } else {
                paragraph.repeat(6)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    c.bench_function("parse_long", |b| b.iter(|| parse_body(black_box(&text))));
}

fn bench_serialize_defaults(c: &mut Criterion) {
    let tree = builtin_defaults().unwrap();
    c.bench_function("serialize_defaults", |b| {
        b.iter(|| {
            for (_, content) in black_box(&tree).iter() {
                black_box(serialize_body(&content.body));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_parse_simple,
    bench_parse_long,
    bench_serialize_defaults
);
criterion_main!(benches);
