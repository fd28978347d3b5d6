//! VM and compiler benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slate_runtime::{compile, Vm};

fn bench_counting_loop(c: &mut Criterion) {
    let program = compile(
        "func main() {
             let i = 0;
             while i < 1000 {
                 set i = i + 1;
             }
             return i;
         }",
    )
    .unwrap();

    c.bench_function("vm_counting_loop_1000", |b| {
        b.iter(|| {
            let mut vm = Vm::new(black_box(program.clone()));
            vm.run().unwrap();
            black_box(vm.operand_stack()[0])
        })
    });
}

fn bench_recursive_fib(c: &mut Criterion) {
    let program = compile(
        "func fib(n) {
             if n < 2 {
                 return n;
             }
             return fib(n - 1) + fib(n - 2);
         }
         func main() { return fib(15); }",
    )
    .unwrap();

    c.bench_function("vm_recursive_fib_15", |b| {
        b.iter(|| {
            let mut vm = Vm::new(black_box(program.clone()));
            vm.run().unwrap();
            black_box(vm.operand_stack()[0])
        })
    });
}

fn bench_compile_pipeline(c: &mut Criterion) {
    let source = "func fib(n) {
             if n < 2 {
                 return n;
             }
             return fib(n - 1) + fib(n - 2);
         }
         func main() { return fib(10); }";

    c.bench_function("compile_fib_program", |b| {
        b.iter(|| compile(black_box(source)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_counting_loop,
    bench_recursive_fib,
    bench_compile_pipeline
);
criterion_main!(benches);
