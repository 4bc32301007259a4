//! mucalc-core - Expression evaluation and completion for the mucalc calculator
//!
//! # Features
//!
//! - **Expression evaluation**: arithmetic, comparison, logic, ternary and
//!   assignment operators over `f64`, comma-separated result lists
//! - **Implicit variables**: unknown names are created on first use, zeroed
//! - **Diagnostics**: errors carry a column and render with a caret line
//! - **Completion**: functions, constants, then variables, by prefix
//!
//! # Example
//!
//! ```rust
//! use mucalc_core::{complete, format_results, CalcEngine};
//!
//! let engine = CalcEngine::with_seed(1).unwrap();
//!
//! let values = engine.evaluate("r = 2, pi * r^2").unwrap();
//! assert_eq!(format_results(&values), "2, 12.5663706144\n");
//!
//! let err = engine.evaluate("2+").unwrap_err();
//! assert_eq!(err.render(None), "Unexpected end of expression at position 3\n2+\n  ^\n");
//!
//! let names: Vec<_> = complete(engine.registry(), "r")
//!     .into_iter()
//!     .map(|c| c.name)
//!     .collect();
//! assert_eq!(names, ["rad", "round", "rint", "random", "r"]);
//! ```
//!
//! # Built-in Functions
//!
//! | Function | Arguments | Description |
//! |----------|-----------|-------------|
//! | `deg`, `rad` | 1 | Radians to degrees and back |
//! | `sin` `cos` `tan` `asin` `acos` `atan` | 1 | Trigonometry (radians) |
//! | `atan2` | 2 | Angle of `(y, x)` |
//! | `sinh` `cosh` `tanh` `asinh` `acosh` `atanh` | 1 | Hyperbolic functions |
//! | `pow` | 2 | `x^y` |
//! | `exp` `exp2` `exp10` | 1 | Exponentials |
//! | `log` `log10` `log2` `ln` | 1 | Logarithms, `log` is base 10 |
//! | `sqrt` `cbrt` `abs` `sign` | 1 | Roots, magnitude and sign |
//! | `fract` `int` `ceil` `floor` `round` `rint` `trunc` | 1 | Rounding |
//! | `mod` | 2 | Floored modulo, same as `%` |
//! | `min` `max` `sum` `avg` `med` `median` | 1+ | Aggregates |
//! | `clamp` | 3 | `clamp(x, lo, hi)` |
//! | `step` | 2 | `step(x, edge)` |
//! | `smoothstep` | 3 | `smoothstep(x, edge0, edge1)` |
//! | `mix` | 3 | `mix(x, y, t)` |
//! | `seed` `random` `gaussian` | 1, 0, 0 | Pseudo random numbers |

pub mod builtin_functions;
pub mod completion;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod format;
pub mod registry;
pub mod state;

// Re-exports for convenience
pub use completion::{complete, next_candidate, Candidate, CandidateKind, CompletionCursor};
pub use diagnostics::Diagnostic;
pub use engine::{ErrorCode, Expression, ParserError};
pub use error::{CalcError, Result};
pub use evaluator::{evaluate, CalcEngine};
pub use format::{format_results, format_value};
pub use registry::{Registry, LAST_RESULT};
pub use state::RandomState;
