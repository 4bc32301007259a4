//! Integration tests for name completion
//!
//! Completion runs against the same registry evaluation writes to, so
//! variables created by earlier expressions become candidates.

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use mucalc_core::{complete, next_candidate, CalcEngine, CandidateKind, CompletionCursor};

fn names(engine: &CalcEngine, prefix: &str) -> Vec<String> {
    complete(engine.registry(), prefix)
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn test_fresh_registry_offers_functions_first() {
    let engine = CalcEngine::with_seed(0).unwrap();
    let candidates = complete(engine.registry(), "s");
    assert_eq!(candidates[0].name, "sin");
    assert_eq!(candidates[1].name, "sinh");
    assert_eq!(candidates[0].replacement(), "sin(");
    assert!(candidates.iter().all(|c| c.kind == CandidateKind::Function));
}

#[test]
fn test_variables_follow_functions_and_constants() {
    let engine = CalcEngine::with_seed(0).unwrap();
    engine.evaluate("pz = 1, pa = 2, pi2 = pz + pa").unwrap();
    assert_eq!(names(&engine, "p"), ["pow", "pi", "pz", "pa", "pi2"]);

    let variables: Vec<_> = complete(engine.registry(), "p")
        .into_iter()
        .filter(|c| c.kind == CandidateKind::Variable)
        .map(|c| c.replacement())
        .collect();
    assert_eq!(variables, ["pz ", "pa ", "pi2 "]);
}

#[test]
fn test_failed_expression_still_creates_variable() {
    let engine = CalcEngine::with_seed(0).unwrap();
    assert!(engine.evaluate("total +").is_err());
    assert_eq!(names(&engine, "tot"), ["total"]);
}

#[test]
fn test_empty_prefix_lists_everything() {
    let engine = CalcEngine::with_seed(0).unwrap();
    engine.evaluate("x = 1").unwrap();
    let all = names(&engine, "");
    let functions = engine.registry().functions().len();
    assert_eq!(all.len(), functions + 2 + 1);
    assert_eq!(all[0], "deg");
    assert_eq!(&all[functions..], ["pi", "e", "x"]);
}

#[test]
fn test_generator_protocol() {
    let engine = CalcEngine::with_seed(0).unwrap();
    let registry = engine.registry();
    let mut cursor = CompletionCursor::default();

    let mut offered = Vec::new();
    let mut state = 0;
    while let Some(candidate) = next_candidate(registry, &mut cursor, "ac", state) {
        offered.push(candidate.name);
        state += 1;
    }
    assert_eq!(offered, ["acos", "acosh"]);
    assert_eq!(cursor.prefix(), "ac");
}
