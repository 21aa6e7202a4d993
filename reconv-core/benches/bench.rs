use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reconv_core::{convert_pattern, convert_substitution};

fn bench_literal_pattern(c: &mut Criterion) {
    let pattern = "hello world this is a plain literal pattern";

    c.bench_function("literal_pattern", |b| {
        b.iter(|| black_box(convert_pattern(black_box(pattern))))
    });
}

fn bench_class_reduction(c: &mut Criterion) {
    let pattern = "[a-zA-Z_][a-zA-Z0-9_]*[ \t]*[^0-9]";

    c.bench_function("class_reduction", |b| {
        b.iter(|| black_box(convert_pattern(black_box(pattern))))
    });
}

fn bench_highlight_pattern(c: &mut Criterion) {
    let pattern = "<(auto|break|case|char|const|continue|default|do|double|else|enum)>";

    c.bench_function("highlight_keywords", |b| {
        b.iter(|| black_box(convert_pattern(black_box(pattern))))
    });
}

fn bench_nested_groups(c: &mut Criterion) {
    let pattern = "((((a|b)+c?)*d{1,2})|(e[0-9]+f))+";

    c.bench_function("nested_groups", |b| {
        b.iter(|| black_box(convert_pattern(black_box(pattern))))
    });
}

fn bench_substitution(c: &mut Criterion) {
    let template = "\\0 -> \\u\\1 [\\2] \\q\\t&";

    c.bench_function("substitution", |b| {
        b.iter(|| black_box(convert_substitution(black_box(template))))
    });
}

criterion_group!(
    benches,
    bench_literal_pattern,
    bench_class_reduction,
    bench_highlight_pattern,
    bench_nested_groups,
    bench_substitution,
);

criterion_main!(benches);
