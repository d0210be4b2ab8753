use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use finite_automata::prelude::*;

const FLOYD_BEIGEL: &str = "-> 1 -> a 2 | b 1
                            () 2 -> a 2 | b 1 | b 3
                               3 -> a 2 | b 4
                            () 4 -> a 4 | b 4";

/// Compares the three membership algorithms for NFAs on tapes of growing length.
fn bench_nfa_acceptance(c: &mut Criterion) {
    let nfa = AutomatonBuilder::from_text(FLOYD_BEIGEL)
        .and_then(|builder| builder.build_nfa())
        .expect("benchmark automaton is well-formed");
    let mut group = c.benchmark_group("nfa_acceptance");

    for len in [8, 32, 128] {
        let tape = "abba".repeat(len / 4);
        group.bench_with_input(BenchmarkId::new("accepts1", len), &tape, |b, tape| {
            b.iter(|| nfa.accepts1(black_box(tape)))
        });
        group.bench_with_input(BenchmarkId::new("accepts2", len), &tape, |b, tape| {
            b.iter(|| nfa.accepts2(black_box(tape)))
        });
        group.bench_with_input(BenchmarkId::new("accepts3", len), &tape, |b, tape| {
            b.iter(|| nfa.accepts3(black_box(tape)))
        });
    }

    group.finish();
}

/// Runs the pipeline from the NFA to the renamed minimal DFA.
fn bench_pipeline(c: &mut Criterion) {
    let nfa = AutomatonBuilder::from_text(FLOYD_BEIGEL)
        .and_then(|builder| builder.build_nfa())
        .expect("benchmark automaton is well-formed");
    c.bench_function("dfa_of_minimal_of_renamed_of", |b| {
        b.iter(|| black_box(&nfa).dfa_of().minimal_of().renamed_of())
    });
}

criterion_group!(benches, bench_nfa_acceptance, bench_pipeline);
criterion_main!(benches);
