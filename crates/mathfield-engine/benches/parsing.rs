use criterion::{Criterion, criterion_group, criterion_main};
use mathfield_engine::{Grammar, MathField};

fn nested_formula(depth: usize) -> String {
    let mut latex = String::from("x");
    for i in 0..depth {
        latex = format!("\\frac{{{latex}+{i}}}{{\\sqrt{{y_{i}^2}}}}");
    }
    latex
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(20);

    let grammar = Grammar::default();
    let flat = "a+b\\cdot c-\\alpha^2+\\left(x+y\\right)".repeat(50);
    let nested = nested_formula(12);

    group.bench_function("flat", |b| {
        b.iter(|| {
            let items = grammar.parse(std::hint::black_box(&flat)).unwrap();
            std::hint::black_box(items);
        });
    });

    group.bench_function("nested", |b| {
        b.iter(|| {
            let items = grammar.parse(std::hint::black_box(&nested)).unwrap();
            std::hint::black_box(items);
        });
    });

    group.bench_function("render_and_serialize", |b| {
        let mut field = MathField::default();
        b.iter(|| {
            field.render_latex_math(std::hint::black_box(&nested));
            std::hint::black_box(field.latex());
        });
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");
    group.sample_size(20);

    group.bench_function("typed_text", |b| {
        b.iter(|| {
            let mut field = MathField::default();
            field.typed_text(std::hint::black_box("1/(x+y)^2+sin(a)*b"));
            std::hint::black_box(field.latex());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_typing);
criterion_main!(benches);
