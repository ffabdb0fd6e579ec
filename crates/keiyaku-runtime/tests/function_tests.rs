//! Function definition, invocation, scope isolation, and early return.

use keiyaku_runtime::{Interpreter, RuntimeError, Value};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Interpreter {
    let mut interp = Interpreter::new();
    interp.run_program(source).expect("program failed");
    interp
}

fn run_err(source: &str) -> RuntimeError {
    let mut interp = Interpreter::new();
    interp.run_program(source).expect_err("program succeeded")
}

// ============================================================================
// Invocation
// ============================================================================

#[test]
fn test_call_in_assignment_position() {
    let interp = run(
        "倍(n) を定義する。\n\
         n と 2 の積を m とする。\n\
         m を返す。\n\
         以上。\n\
         X は 倍(4) とする。",
    );
    assert_eq!(interp.get("X"), Some(&Value::Int(8)));
}

#[test]
fn test_call_with_multiple_arguments() {
    let interp = run(
        "加算(a, b) を定義する。\n\
         a に b を加えた数を c とする。\n\
         c を返す。\n\
         以上。\n\
         X は 加算(2, 3) とする。",
    );
    assert_eq!(interp.get("X"), Some(&Value::Int(5)));
}

#[test]
fn test_nested_calls_in_arguments() {
    let interp = run(
        "倍(n) を定義する。\n\
         n と 2 の積を m とする。\n\
         m を返す。\n\
         以上。\n\
         X は 倍(倍(3)) とする。",
    );
    assert_eq!(interp.get("X"), Some(&Value::Int(12)));
}

#[test]
fn test_call_with_string_argument() {
    let interp = run(
        "表示(s) を定義する。\n\
         s を出力する。\n\
         1 を返す。\n\
         以上。\n\
         X は 表示(「a, b」) とする。",
    );
    assert_eq!(interp.outputs(), &[Value::Str("a, b".to_string())]);
}

// ============================================================================
// Scope isolation
// ============================================================================

#[test]
fn test_body_assignment_does_not_leak_out() {
    let interp = run(
        "n は 100 とする。\n\
         書換(x) を定義する。\n\
         n は x とする。\n\
         n を返す。\n\
         以上。\n\
         Y は 書換(1) とする。",
    );
    assert_eq!(interp.get("n"), Some(&Value::Int(100)));
    assert_eq!(interp.get("Y"), Some(&Value::Int(1)));
}

#[test]
fn test_caller_bindings_are_invisible_inside_body() {
    // The call environment holds only the bound parameters.
    let err = run_err(
        "秘密 は 42 とする。\n\
         覗く(x) を定義する。\n\
         秘密 を返す。\n\
         以上。\n\
         Y は 覗く(1) とする。",
    );
    match err {
        RuntimeError::UnresolvedReference { token, .. } => assert_eq!(token, "秘密"),
        other => panic!("expected UnresolvedReference, got {:?}", other),
    }
}

#[test]
fn test_environment_restored_after_failed_call() {
    let mut interp = Interpreter::new();
    let result = interp.run_program(
        "n は 100 とする。\n\
         壊す(x) を定義する。\n\
         n は x とする。\n\
         未定義 を出力する。\n\
         以上。\n\
         Y は 壊す(1) とする。",
    );
    assert!(result.is_err());
    // The failure inside the body must not corrupt the caller's scope.
    assert_eq!(interp.get("n"), Some(&Value::Int(100)));
    assert_eq!(interp.get("Y"), None);
}

// ============================================================================
// Early return
// ============================================================================

#[test]
fn test_return_skips_following_lines() {
    let interp = run(
        "f(n) を定義する。\n\
         n を返す。\n\
         「届かない」を出力する。\n\
         以上。\n\
         X は f(7) とする。",
    );
    assert_eq!(interp.get("X"), Some(&Value::Int(7)));
    assert_eq!(interp.outputs(), &[] as &[Value]);
}

#[test]
fn test_return_propagates_through_loop_and_conditional() {
    let interp = run(
        "探す(n) を定義する。\n\
         10 回、以下を行う。\n\
         もし n が 0 でなければ、以下を行う。\n\
         n を返す。\n\
         以上。\n\
         n に 1 を加えた数を n とする。\n\
         以上。\n\
         0 を返す。\n\
         以上。\n\
         X は 探す(5) とする。",
    );
    // The first iteration returns immediately out of both nested blocks.
    assert_eq!(interp.get("X"), Some(&Value::Int(5)));
}

#[test]
fn test_return_stops_loop_iterations() {
    let interp = run(
        "f(n) を定義する。\n\
         3 回、以下を行う。\n\
         n に 1 を加えた数を n とする。\n\
         n を返す。\n\
         以上。\n\
         以上。\n\
         X は f(0) とする。",
    );
    // Returned during the first iteration, so n incremented once.
    assert_eq!(interp.get("X"), Some(&Value::Int(1)));
}

// ============================================================================
// Arity and errors
// ============================================================================

#[test]
fn test_arity_mismatch() {
    let err = run_err(
        "倍(n) を定義する。\n\
         n を返す。\n\
         以上。\n\
         X は 倍(1, 2) とする。",
    );
    match err {
        RuntimeError::ArityMismatch {
            name,
            expected,
            actual,
            ..
        } => {
            assert_eq!(name, "倍");
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected ArityMismatch, got {:?}", other),
    }
}

#[test]
fn test_error_inside_body_reports_body_line() {
    let err = run_err(
        "f() を定義する。\n\
         未定義 を出力する。\n\
         以上。\n\
         X は f() とする。",
    );
    // Line 2 is the failing body line, not line 4 (the call site).
    assert_eq!(err.span().line, 2);
}

#[test]
fn test_zero_argument_call() {
    let interp = run(
        "七() を定義する。\n\
         7 を返す。\n\
         以上。\n\
         X は 七() とする。",
    );
    assert_eq!(interp.get("X"), Some(&Value::Int(7)));
}
