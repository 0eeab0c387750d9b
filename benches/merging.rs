//! Benchmarks for merging overrides over the defaults.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tabpress::content::{ContactDetails, OverrideTree, TabOverride, merge_content};
use tabpress::defaults::builtin_defaults;

fn bench_merge_empty(c: &mut Criterion) {
    let defaults = builtin_defaults().unwrap();
    let overrides = OverrideTree::new();
    c.bench_function("merge_empty", |b| {
        b.iter(|| merge_content(black_box(&defaults), black_box(&overrides)));
    });
}

fn bench_merge_every_tab(c: &mut Criterion) {
    let defaults = builtin_defaults().unwrap();
    let mut overrides = OverrideTree::from(defaults.clone());
    overrides.insert(
        "contact",
        TabOverride {
            contact_details: Some(ContactDetails {
                phone_number: Some("+48 000 000 000".to_string()),
                ..ContactDetails::default()
            }),
            ..TabOverride::default()
        },
    );
    c.bench_function("merge_every_tab", |b| {
        b.iter(|| merge_content(black_box(&defaults), black_box(&overrides)));
    });
}

criterion_group!(benches, bench_merge_empty, bench_merge_every_tab);
criterion_main!(benches);
