// Evaluator benchmarks for wox.

use criterion::{black_box, criterion_group, criterion_main, Bencher, BenchmarkId, Criterion};
use wox_interpreter::Interpreter;
use wox_syntax::diagnostic::DiagnosticSink;
use wox_syntax::{scan_and_parse, Program};

fn parse(interp: &mut Interpreter<std::io::Sink>, source: &str) -> Program {
    let mut sink = DiagnosticSink::new();
    let program = scan_and_parse(source, interp.interner_mut(), &mut sink);
    assert!(!sink.has_errors());
    program
}

/// Recursive calls through closures.
fn bench_fib(c: &mut Criterion) {
    let mut interp = Interpreter::new(std::io::sink());
    let program = parse(
        &mut interp,
        "fn fib(n) { return if n < 2 then n else fib(n - 1) + fib(n - 2); } fib(15);",
    );

    c.bench_function("fib_15", |b: &mut Bencher| {
        b.iter(|| interp.execute_program(black_box(&program)))
    });
}

/// Method dispatch up a three-level class chain.
fn bench_method_dispatch(c: &mut Criterion) {
    let mut interp = Interpreter::new(std::io::sink());
    let setup = parse(
        &mut interp,
        "class A { get() { return 1; } } class B < A {} class C < B {} var obj = C();",
    );
    let _ = interp.execute_program(&setup);
    let program = parse(
        &mut interp,
        "var total = 0; for (var i = 0; i < 200; i = i + 1) total = total + obj.get();",
    );

    c.bench_function("method_dispatch", |b: &mut Bencher| {
        b.iter(|| interp.execute_program(black_box(&program)))
    });
}

/// Pattern matching over tuples of growing count.
fn bench_case_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("case_matching");

    for count in [10, 100, 1000] {
        let mut interp = Interpreter::new(std::io::sink());
        let source = format!(
            "fn pick(v) {{ return case v of {{ (0, _) then 0, (a, b) if a > b then a, (_, b) then b }}; }}
             for (var i = 0; i < {count}; i = i + 1) pick((i, 50));"
        );
        let program = parse(&mut interp, &source);
        group.bench_with_input(BenchmarkId::from_parameter(count), &program, |b: &mut Bencher, program| {
            b.iter(|| interp.execute_program(black_box(program)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fib, bench_method_dispatch, bench_case_matching);
criterion_main!(benches);
