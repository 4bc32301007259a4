//! CalcEngine - Expression evaluator bound to the calculator registry
//!
//! Provides evaluation of comma-separated expression lists with:
//! - Arithmetic: +, -, *, /, %, ^
//! - Comparison: <, >, <=, >=, ==, !=
//! - Logic: &&, ||, ?:
//! - Assignment: =, +=, -=, *=, /=
//! - Implicit variables and the `_` last result

use crate::diagnostics::Diagnostic;
use crate::engine::Expression;
use crate::error::Result;
use crate::registry::Registry;
use crate::state::RandomState;
use std::rc::Rc;
use tracing::trace;

/// Compile `expression` against `registry` and evaluate every item.
///
/// On success the first value is stored as the last result. On failure the
/// registry is left unchanged, apart from implicit variables the parser
/// already created.
pub fn evaluate(
    registry: &Registry,
    expression: &str,
) -> std::result::Result<Vec<f64>, Diagnostic> {
    let compiled = Expression::parse(expression, registry).map_err(|e| {
        trace!(expression, error = %e, "evaluation failed");
        Diagnostic::from_parser_error(&e, expression)
    })?;

    let values = compiled.eval();
    if let Some(&first) = values.first() {
        registry.set_last_result(first);
    }
    trace!(expression, ?values, "evaluated");
    Ok(values)
}

/// CalcEngine - owns the registry of one calculator session
///
/// # Example
/// ```
/// use mucalc_core::CalcEngine;
///
/// let engine = CalcEngine::new().unwrap();
/// assert_eq!(engine.evaluate("a = 2^3 + 2").unwrap(), vec![10.0]);
/// assert_eq!(engine.evaluate("a * 2, _").unwrap(), vec![20.0, 10.0]);
/// ```
pub struct CalcEngine {
    registry: Rc<Registry>,
}

impl CalcEngine {
    /// Create an engine with the standard registry and a clock-seeded
    /// generator.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(Registry::initialize()?))
    }

    /// Create an engine whose generator starts from `seed`.
    pub fn with_seed(seed: u64) -> Result<Self> {
        Ok(Self::with_registry(Registry::with_random(
            RandomState::seeded(seed),
        )?))
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry: Rc::new(registry),
        }
    }

    /// Shared handle to the registry, e.g. for the completion helper
    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }

    /// Compile without evaluating.
    pub fn compile(&self, expression: &str) -> Result<Expression> {
        Ok(Expression::parse(expression, self.registry.as_ref())?)
    }

    /// See [`evaluate`].
    pub fn evaluate(&self, expression: &str) -> std::result::Result<Vec<f64>, Diagnostic> {
        evaluate(&self.registry, expression)
    }
}
