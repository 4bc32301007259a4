//! Integration tests for the evaluation contract
//!
//! Evaluates expressions against a full registry and checks printed results,
//! `_` bookkeeping, implicit variables and rendered diagnostics.

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use mucalc_core::{format_results, CalcEngine, Diagnostic, LAST_RESULT};

fn engine() -> CalcEngine {
    CalcEngine::with_seed(42).unwrap()
}

fn printed(engine: &CalcEngine, expression: &str) -> String {
    format_results(&engine.evaluate(expression).unwrap())
}

fn failed(engine: &CalcEngine, expression: &str) -> Diagnostic {
    engine.evaluate(expression).unwrap_err()
}

#[test]
fn test_simple_expression_prints_value() {
    let engine = engine();
    assert_eq!(printed(&engine, "2+3"), "5\n");
    assert_eq!(printed(&engine, "1/3"), "0.333333333333\n");
    assert_eq!(printed(&engine, "2^0.5, -1, 1e15"), "1.41421356237, -1, 1e+15\n");
}

#[test]
fn test_library_functions() {
    let engine = engine();
    assert_eq!(printed(&engine, "log(1000), ln(e), log2(8)"), "3, 1, 3\n");
    assert_eq!(printed(&engine, "round(2.5), rint(2.5), trunc(-2.5)"), "3, 2, -2\n");
    assert_eq!(printed(&engine, "int(-3.9), fract(-0.25), sign(-4)"), "-3, 0.75, -1\n");
    assert_eq!(printed(&engine, "mod(-7, 3), -7 % 3"), "2, 2\n");
    assert_eq!(printed(&engine, "med(5, 1, 4, 2), median(3, 1, 2)"), "3, 2\n");
    assert_eq!(printed(&engine, "min(3, -1, 2), max(3, -1, 2)"), "-1, 3\n");
    assert_eq!(printed(&engine, "sum(1, 2, 3), avg(1, 2, 3, 4)"), "6, 2.5\n");
    assert_eq!(printed(&engine, "clamp(7, 0, 5), step(0.5, 1)"), "5, 0\n");
    assert_eq!(printed(&engine, "smoothstep(0.5, 0, 1), mix(0, 10, 0.25)"), "0.5, 2.5\n");
    assert_eq!(printed(&engine, "deg(pi), rad(90)"), "180, 1.57079632679\n");
    assert_eq!(printed(&engine, "exp2(10), exp10(3), cbrt(27)"), "1024, 1000, 3\n");
    assert_eq!(printed(&engine, "atan2(1, 1) * 4"), "3.14159265359\n");
}

#[test]
fn test_assignment_chain_across_calls() {
    let engine = engine();
    assert_eq!(printed(&engine, "a=2^3+2"), "10\n");
    assert_eq!(printed(&engine, "a*2"), "20\n");
    assert_eq!(printed(&engine, "a -= 4, a *= 3, a /= 2, a"), "6, 18, 9, 9\n");
}

#[test]
fn test_implicit_variable_is_zero_and_reused() {
    let engine = engine();
    assert_eq!(printed(&engine, "width"), "0\n");
    assert_eq!(printed(&engine, "width = 3"), "3\n");
    assert_eq!(printed(&engine, "width * width"), "9\n");
    assert_eq!(engine.registry().variable_names(), ["width"]);
    assert_eq!(engine.registry().variable("width"), Some(3.0));
}

#[test]
fn test_last_result_is_first_value() {
    let engine = engine();
    assert_eq!(printed(&engine, "7, 8"), "7, 8\n");
    assert_eq!(printed(&engine, "_"), "7\n");
    assert_eq!(printed(&engine, "_ * 3"), "21\n");
    assert_eq!(engine.registry().variable(LAST_RESULT), Some(21.0));
}

#[test]
fn test_failure_does_not_touch_last_result() {
    let engine = engine();
    engine.evaluate("12").unwrap();
    failed(&engine, "1 +* 2");
    failed(&engine, "sin(");
    assert_eq!(printed(&engine, "_"), "12\n");
}

#[test]
fn test_end_of_input_diagnostic() {
    let engine = engine();
    let diagnostic = failed(&engine, "2+");
    assert_eq!(
        diagnostic.render(Some("Expression 1")),
        "Expression 1: Unexpected end of expression at position 3\n2+\n  ^\n"
    );
}

#[test]
fn test_operator_diagnostic() {
    let engine = engine();
    let diagnostic = failed(&engine, "2+*3");
    assert_eq!(
        diagnostic.message,
        "Unexpected operator \"*\" found at position 3"
    );
    assert_eq!(diagnostic.render(None), format!("{}\n2+*3\n  ^\n", diagnostic.message));
}

#[test]
fn test_other_diagnostics() {
    let engine = engine();
    assert_eq!(failed(&engine, "(1+2").message, "Missing parenthesis");
    assert_eq!(
        failed(&engine, "sin(1, 2)").message,
        "Too many parameters for function \"sin\" at expression position 1"
    );
    assert_eq!(
        failed(&engine, "1 ? 2").message,
        "If-then-else operator is missing an else clause"
    );
    assert_eq!(
        failed(&engine, "1 # 2").message,
        "Unexpected token \"# 2\" found at position 3."
    );
    assert_eq!(
        failed(&engine, "2 pi").message,
        "Unexpected value \"pi\" found at position 3"
    );
}

#[test]
fn test_seed_makes_draws_repeatable() {
    let engine = engine();
    let first = engine.evaluate("seed(3), random(), random(), gaussian()").unwrap();
    let second = engine.evaluate("seed(3), random(), random(), gaussian()").unwrap();
    assert_eq!(first, second);
    assert!((0.0..1.0).contains(&first[1]));
    assert_ne!(first[1], first[2]);
}

#[test]
fn test_volatile_calls_are_not_folded() {
    let engine = engine();
    assert!(!engine.compile("random() * 2").unwrap().is_constant());
    assert!(engine.compile("sqrt(16) + pi").unwrap().is_constant());
}
