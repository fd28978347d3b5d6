//! End-to-end execution tests: compile Slate source and run it to halt

use pretty_assertions::assert_eq;
use rstest::rstest;
use slate_runtime::{compile, Vm};

/// Compile and run, returning the VM at halt
fn run(source: &str) -> Vm {
    let program = compile(source).expect("compilation failed");
    let mut vm = Vm::new(program);
    vm.run().expect("execution failed");
    vm
}

/// Compile and run a program, returning the value `main` left behind
fn run_main(source: &str) -> i64 {
    let vm = run(source);
    assert_eq!(
        vm.operand_stack().len(),
        1,
        "expected exactly one value at halt"
    );
    assert!(
        vm.frame_stack().is_empty(),
        "call-frame stack not unwound: {:?}",
        vm.frame_stack()
    );
    vm.operand_stack()[0]
}

#[test]
fn declare_then_read() {
    assert_eq!(run_main("func main() { let x = 5; return x + 1; }"), 6);
}

#[test]
fn main_without_return_leaves_nothing() {
    let vm = run("func main() { let x = 5; }");
    assert!(vm.operand_stack().is_empty());
    assert!(vm.frame_stack().is_empty());
}

#[test]
fn expression_statement_value_is_discarded() {
    assert_eq!(run_main("func main() { 1 + 2; return 9; }"), 9);
}

#[rstest]
#[case("2 + 3 * 4", 14)]
#[case("2 * 3 + 4", 10)]
#[case("2 + 3 * 4 - 6 / 2", 11)]
#[case("10 % 4 * 2", 4)]
#[case("-2 * 3 + 10", 4)]
#[case("10 - 4 - 3", 3)]
#[case("100 / 10 / 5", 2)]
#[case("1 + 2 < 3 * 4", 1)]
#[case("3 > 2 == 1", 1)]
#[case("!0 + !5", 1)]
#[case("-(1 + 2) * 3", -9)]
#[case("(2 + 3) * (4 - 6)", -10)]
fn arithmetic_precedence(#[case] expr: &str, #[case] want: i64) {
    let source = format!("func main() {{ return {}; }}", expr);
    assert_eq!(run_main(&source), want, "expression: {}", expr);
}

#[test]
fn sequential_redeclaration_rebinds() {
    assert_eq!(
        run_main("func main() { let x = 1; let x = x + 1; return x; }"),
        1,
        "a self-referential initializer reads the new zero-filled slot"
    );
    assert_eq!(
        run_main("func main() { let x = 1; let y = x; let x = 40; return x + y; }"),
        41
    );
}

#[test]
fn inner_block_shadowing_does_not_disturb_outer_slot() {
    assert_eq!(
        run_main(
            "func main() {
                 let x = 1;
                 {
                     let x = 10;
                     set x = x + 5;
                 }
                 return x;
             }"
        ),
        1
    );
}

#[test]
fn outer_binding_visible_inside_nested_block() {
    assert_eq!(
        run_main(
            "func main() {
                 let x = 1;
                 {
                     set x = x + 41;
                 }
                 return x;
             }"
        ),
        42
    );
}

#[test]
fn conditional_exclusivity() {
    // Only the first true branch runs, even when later conditions are
    // also true
    assert_eq!(
        run_main(
            "func main() {
                 let r = 0;
                 if 0 {
                     set r = 1;
                 } elif 1 {
                     set r = 2;
                 } elif 1 {
                     set r = 3;
                 } else {
                     set r = 4;
                 }
                 return r;
             }"
        ),
        2
    );
}

#[test]
fn else_runs_when_no_condition_holds() {
    assert_eq!(
        run_main(
            "func main() {
                 let r = 0;
                 if 0 { set r = 1; } elif 0 { set r = 2; } else { set r = 3; }
                 return r;
             }"
        ),
        3
    );
}

#[test]
fn if_without_else_falls_through() {
    assert_eq!(
        run_main("func main() { let r = 7; if 0 { set r = 1; } return r; }"),
        7
    );
}

#[test]
fn loop_count() {
    assert_eq!(
        run_main(
            "func main() {
                 let i = 0;
                 while i < 3 {
                     set i = i + 1;
                 }
                 return i;
             }"
        ),
        3
    );
}

#[test]
fn loop_body_executes_exactly_count_times() {
    assert_eq!(
        run_main(
            "func main() {
                 let i = 0;
                 let n = 0;
                 while i < 3 {
                     set i = i + 1;
                     set n = n + 10;
                 }
                 return n;
             }"
        ),
        30
    );
}

#[test]
fn loop_with_false_condition_never_runs() {
    assert_eq!(
        run_main("func main() { let n = 5; while 0 { set n = 0; } return n; }"),
        5
    );
}

#[test]
fn call_round_trip() {
    // The call leaves exactly the sum and restores the call-frame stack
    assert_eq!(
        run_main(
            "func add(a, b) {
                 return a + b;
             }
             func main() {
                 return add(2, 3);
             }"
        ),
        5
    );
}

#[test]
fn argument_order_is_preserved() {
    assert_eq!(
        run_main("func sub(a, b) { return a - b; } func main() { return sub(10, 4); }"),
        6
    );
}

#[test]
fn arguments_can_be_calls() {
    assert_eq!(
        run_main(
            "func add(a, b) { return a + b; }
             func main() { return add(add(1, 2), add(3, 4)); }"
        ),
        10
    );
}

#[test]
fn locals_load_correctly_inside_argument_expressions() {
    // While argument placeholders sit on the frame stack, local offsets
    // deepen accordingly
    assert_eq!(
        run_main(
            "func id(a) { return a; }
             func main() { let x = 7; return id(id(x)); }"
        ),
        7
    );
}

#[test]
fn callee_locals_and_arguments_coexist() {
    assert_eq!(
        run_main(
            "func weigh(a, b) {
                 let t = a * 10;
                 return t + b;
             }
             func main() { return weigh(4, 2); }"
        ),
        42
    );
}

#[test]
fn forward_call() {
    assert_eq!(
        run_main("func main() { return later(); } func later() { return 8; }"),
        8
    );
}

#[test]
fn mid_function_return_unwinds_once() {
    // A return nested in a branch still reaches the shared epilogue;
    // nothing leaks on either stack
    assert_eq!(
        run_main(
            "func pick(n) {
                 let unused = 99;
                 if n > 0 {
                     return 1;
                 }
                 return 2;
             }
             func main() { return pick(5); }"
        ),
        1
    );
}

#[test]
fn return_from_loop_body() {
    assert_eq!(
        run_main(
            "func first_multiple(step, floor) {
                 let n = 0;
                 while 1 {
                     set n = n + step;
                     if n >= floor {
                         return n;
                     }
                 }
                 return 0;
             }
             func main() { return first_multiple(7, 30); }"
        ),
        35
    );
}

#[test]
fn recursion_factorial() {
    assert_eq!(
        run_main(
            "func fact(n) {
                 if n <= 1 {
                     return 1;
                 }
                 return n * fact(n - 1);
             }
             func main() { return fact(5); }"
        ),
        120
    );
}

#[test]
fn recursion_fibonacci() {
    assert_eq!(
        run_main(
            "func fib(n) {
                 if n < 2 {
                     return n;
                 }
                 return fib(n - 1) + fib(n - 2);
             }
             func main() { return fib(10); }"
        ),
        55
    );
}

#[test]
fn iterative_fibonacci() {
    assert_eq!(
        run_main(
            "func fib(n) {
                 let a = 0;
                 let b = 1;
                 while n > 0 {
                     let t = b;
                     set b = a + b;
                     set a = t;
                     set n = n - 1;
                 }
                 return a;
             }
             func main() { return fib(20); }"
        ),
        6765
    );
}

#[test]
fn parameters_are_writable() {
    assert_eq!(
        run_main(
            "func double_until(n, cap) {
                 while n < cap {
                     set n = n * 2;
                 }
                 return n;
             }
             func main() { return double_until(3, 20); }"
        ),
        24
    );
}

#[test]
fn not_in_condition() {
    assert_eq!(
        run_main("func main() { let r = 0; if !0 { set r = 1; } return r; }"),
        1
    );
}

#[test]
fn comparison_results_are_zero_or_one() {
    assert_eq!(run_main("func main() { return (3 < 4) + (4 < 3); }"), 1);
}

#[test]
fn disassembly_names_functions_and_entry() {
    let program = compile(
        "func add(a, b) { return a + b; } func main() { return add(1, 2); }",
    )
    .unwrap();
    let dump = slate_runtime::disassemble(&program);
    assert!(dump.contains("=== Functions ==="));
    assert!(dump.contains("add"));
    assert!(dump.contains("main"));
    assert!(dump.contains("entry:"));
    assert!(dump.contains("func add"));
    assert!(dump.contains("jmpi"));
}
