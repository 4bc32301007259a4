//! Expression engine
//!
//! A small infix expression compiler for `f64` arithmetic:
//!
//! - `logos` scanner over the input plus one blank of padding, so every
//!   token is followed by a delimiter
//! - Precedence parser (assignment, `?:`, `||`, `&&`, comparisons, `+ -`,
//!   `* /`, prefix signs, right-associative `^`) with bounded nesting
//! - Compiled expression tree with constant folding
//!
//! The engine owns no names. Constants, functions, extra operators and
//! variables are supplied by a [`SymbolTable`] and a [`VariableSource`];
//! unknown identifiers are handed to [`VariableSource::get_or_create`] while
//! parsing, which makes implicit variables possible.

mod error;
mod node;
mod parser;
mod scanner;

pub use error::{ErrorCode, ParserError};
pub use node::Expression;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Storage slot of a variable.
///
/// Compiled expressions keep a clone of the handle, so the slot must outlive
/// every expression that references it.
pub type Var = Rc<Cell<f64>>;

/// Number of arguments a function accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments
    Fixed(usize),
    /// One or more arguments
    Variadic,
}

/// A named function callable from expressions
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: Arity,
    volatile: bool,
    callback: Rc<dyn Fn(&[f64]) -> f64>,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        callback: impl Fn(&[f64]) -> f64 + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            volatile: false,
            callback: Rc::new(callback),
        }
    }

    /// Mark the function as volatile: calls are never folded at compile time.
    pub fn volatile(mut self) -> Self {
        self.volatile = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    pub fn call(&self, args: &[f64]) -> f64 {
        (self.callback)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("volatile", &self.volatile)
            .finish()
    }
}

/// Binding strength of a binary operator, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    LogicOr = 1,
    LogicAnd = 2,
    Comparison = 4,
    Additive = 5,
    Multiplicative = 6,
    Power = 7,
}

impl Precedence {
    pub(crate) fn level(self) -> u8 {
        self as u8
    }
}

/// A user-defined left-associative binary operator
#[derive(Clone)]
pub struct BinaryOperator {
    symbol: String,
    precedence: Precedence,
    callback: Rc<dyn Fn(f64, f64) -> f64>,
}

impl BinaryOperator {
    pub fn new(
        symbol: impl Into<String>,
        precedence: Precedence,
        callback: impl Fn(f64, f64) -> f64 + 'static,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            precedence,
            callback: Rc::new(callback),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        (self.callback)(lhs, rhs)
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .finish()
    }
}

/// A user-defined prefix operator, e.g. a unary `+`
#[derive(Clone)]
pub struct PrefixOperator {
    symbol: String,
    callback: Rc<dyn Fn(f64) -> f64>,
}

impl PrefixOperator {
    pub fn new(symbol: impl Into<String>, callback: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            symbol: symbol.into(),
            callback: Rc::new(callback),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn apply(&self, value: f64) -> f64 {
        (self.callback)(value)
    }
}

impl fmt::Debug for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixOperator")
            .field("symbol", &self.symbol)
            .finish()
    }
}

/// What a name resolves to
#[derive(Debug, Clone)]
pub enum Symbol {
    Constant(f64),
    Variable(Var),
    Function(Rc<Function>),
}

/// Name and operator lookup used by the parser
pub trait SymbolTable {
    /// Resolve an identifier.
    fn lookup(&self, name: &str) -> Option<Symbol>;

    /// User-defined binary operator spelled `symbol`.
    fn binary_operator(&self, symbol: &str) -> Option<Rc<BinaryOperator>>;

    /// User-defined prefix operator spelled `symbol`.
    fn prefix_operator(&self, symbol: &str) -> Option<Rc<PrefixOperator>>;

    /// Operator spellings the scanner must accept besides the built-in ones.
    fn operator_symbols(&self) -> Vec<String>;
}

/// Factory for implicit variables
pub trait VariableSource {
    /// Return the slot bound to `name`, creating a zeroed one on first use.
    fn get_or_create(&self, name: &str) -> Var;
}
