use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use interviewsim_core::bank::QuestionBank;
use interviewsim_core::model::Mode;
use interviewsim_core::scoring::{heuristic_evaluate, parse_evaluation};

fn long_answer(words: usize) -> String {
    let mut text = String::from("The time complexity is O(n log n) and the trade-off is memory. ");
    for i in 0..words {
        text.push_str(if i % 7 == 0 { "scalable " } else { "detail " });
    }
    text
}

fn bench_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic");

    let short = "A thread shares memory with its process.";
    let medium = long_answer(50);
    let long = long_answer(1_000);

    group.bench_function("short", |b| b.iter(|| heuristic_evaluate(black_box(short))));
    group.bench_function("medium", |b| b.iter(|| heuristic_evaluate(black_box(&medium))));
    group.bench_function("long", |b| b.iter(|| heuristic_evaluate(black_box(&long))));

    group.finish();
}

fn bench_parse_remote(c: &mut Criterion) {
    let body = r#"```json
{"score": 7.5, "strengths": ["clear", "structured"], "weaknesses": ["no example"],
 "feedback": "Solid answer.", "suggested_improvement": "Add an example.",
 "resources": ["System Design Primer"]}
```"#;

    c.bench_function("parse_evaluation", |b| {
        b.iter(|| parse_evaluation(black_box(body)))
    });
}

fn bench_select(c: &mut Criterion) {
    let bank = QuestionBank::builtin();
    let mut rng = StdRng::seed_from_u64(0);

    c.bench_function("select_sample", |b| {
        b.iter(|| {
            bank.select(
                black_box("Software Engineer"),
                black_box("General"),
                Mode::Technical,
                2,
                &mut rng,
            )
        })
    });
}

criterion_group!(benches, bench_heuristic, bench_parse_remote, bench_select);
criterion_main!(benches);
