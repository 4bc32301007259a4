//! Symbol registry
//!
//! Binds constants, the built-in function library, the `%` and prefix `+`
//! operators, the `_` last-result slot and implicit variables into one symbol
//! table the engine compiles against.

use crate::builtin_functions as lib;
use crate::engine::{
    Arity, BinaryOperator, Function, Precedence, PrefixOperator, Symbol, SymbolTable, Var,
    VariableSource,
};
use crate::error::{CalcError, Result};
use crate::state::RandomState;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::{E, PI};
use std::rc::Rc;
use tracing::debug;

/// Name of the last-result variable
pub const LAST_RESULT: &str = "_";

/// Implicit variables in creation order
#[derive(Default)]
struct VariableTable {
    slots: Vec<(String, Var)>,
    index: HashMap<String, usize>,
}

impl VariableTable {
    fn get(&self, name: &str) -> Option<Var> {
        self.index.get(name).map(|&i| Rc::clone(&self.slots[i].1))
    }

    fn push(&mut self, name: &str, var: Var) {
        self.index.insert(name.to_string(), self.slots.len());
        self.slots.push((name.to_string(), var));
    }
}

/// Symbol registry shared by evaluation and completion
///
/// Constants, functions and operators are fixed once [`Registry::initialize`]
/// returns. Implicit variables are appended while expressions are parsed and
/// are never removed, so handles captured by compiled expressions stay valid
/// for the lifetime of the registry.
pub struct Registry {
    symbols: HashMap<String, Symbol>,
    constants: Vec<String>,
    functions: Vec<Rc<Function>>,
    binary_operators: HashMap<String, Rc<BinaryOperator>>,
    prefix_operators: HashMap<String, Rc<PrefixOperator>>,
    variables: RefCell<VariableTable>,
    last_result: Var,
    random: Rc<RefCell<RandomState>>,
}

impl Registry {
    /// Build the calculator's registry with a clock-seeded generator.
    pub fn initialize() -> Result<Self> {
        Self::with_random(RandomState::from_clock())
    }

    /// Build the calculator's registry around a given generator.
    pub fn with_random(random: RandomState) -> Result<Self> {
        let mut registry = Self::empty(random);

        registry.define_constant("pi", PI)?;
        registry.define_constant("e", E)?;
        registry.define_binary_operator(BinaryOperator::new(
            "%",
            Precedence::Multiplicative,
            lib::modulo,
        ))?;
        registry.define_prefix_operator(PrefixOperator::new("+", lib::unary_plus))?;
        for function in registry.function_library() {
            registry.define_function(function)?;
        }
        let last_result = Rc::clone(&registry.last_result);
        registry.define_variable(LAST_RESULT, last_result)?;

        debug!(
            constants = registry.constants.len(),
            functions = registry.functions.len(),
            "symbol registry initialized"
        );
        Ok(registry)
    }

    /// Registry without any symbols.
    pub fn empty(random: RandomState) -> Self {
        Self {
            symbols: HashMap::new(),
            constants: Vec::new(),
            functions: Vec::new(),
            binary_operators: HashMap::new(),
            prefix_operators: HashMap::new(),
            variables: RefCell::new(VariableTable::default()),
            last_result: Rc::new(Cell::new(0.0)),
            random: Rc::new(RefCell::new(random)),
        }
    }

    pub fn define_constant(&mut self, name: &str, value: f64) -> Result<()> {
        self.claim(name)?;
        self.symbols.insert(name.to_string(), Symbol::Constant(value));
        self.constants.push(name.to_string());
        Ok(())
    }

    pub fn define_function(&mut self, function: Function) -> Result<()> {
        self.claim(function.name())?;
        let function = Rc::new(function);
        self.symbols.insert(
            function.name().to_string(),
            Symbol::Function(Rc::clone(&function)),
        );
        self.functions.push(function);
        Ok(())
    }

    /// Bind a pre-allocated slot under `name`. It is not listed among the
    /// implicit variables.
    pub fn define_variable(&mut self, name: &str, var: Var) -> Result<()> {
        self.claim(name)?;
        self.symbols.insert(name.to_string(), Symbol::Variable(var));
        Ok(())
    }

    pub fn define_binary_operator(&mut self, op: BinaryOperator) -> Result<()> {
        if self.binary_operators.contains_key(op.symbol()) {
            return Err(CalcError::duplicate_symbol(op.symbol()));
        }
        self.binary_operators
            .insert(op.symbol().to_string(), Rc::new(op));
        Ok(())
    }

    pub fn define_prefix_operator(&mut self, op: PrefixOperator) -> Result<()> {
        if self.prefix_operators.contains_key(op.symbol()) {
            return Err(CalcError::duplicate_symbol(op.symbol()));
        }
        self.prefix_operators
            .insert(op.symbol().to_string(), Rc::new(op));
        Ok(())
    }

    fn claim(&self, name: &str) -> Result<()> {
        if self.symbols.contains_key(name) || self.variables.borrow().get(name).is_some() {
            return Err(CalcError::duplicate_symbol(name));
        }
        Ok(())
    }

    /// Functions in declaration order
    pub fn functions(&self) -> &[Rc<Function>] {
        &self.functions
    }

    /// Constant names in declaration order
    pub fn constant_names(&self) -> &[String] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        match self.symbols.get(name) {
            Some(Symbol::Constant(value)) => Some(*value),
            _ => None,
        }
    }

    /// Number of implicit variables created so far
    pub fn variable_count(&self) -> usize {
        self.variables.borrow().slots.len()
    }

    /// Name of the `index`-th implicit variable, in creation order
    pub fn variable_name(&self, index: usize) -> Option<String> {
        self.variables
            .borrow()
            .slots
            .get(index)
            .map(|(name, _)| name.clone())
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables
            .borrow()
            .slots
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Current value of a variable, including `_`
    pub fn variable(&self, name: &str) -> Option<f64> {
        match self.symbols.get(name) {
            Some(Symbol::Variable(var)) => Some(var.get()),
            Some(_) => None,
            None => self.variables.borrow().get(name).map(|var| var.get()),
        }
    }

    pub fn last_result(&self) -> f64 {
        self.last_result.get()
    }

    pub fn set_last_result(&self, value: f64) {
        self.last_result.set(value);
    }

    /// Reseed the shared generator, as `seed(x)` does.
    pub fn reseed(&self, x: f64) {
        self.random.borrow_mut().reseed(x);
    }

    /// The calculator's functions, in the order they are offered for
    /// completion.
    fn function_library(&self) -> Vec<Function> {
        let seed_state = Rc::clone(&self.random);
        let random_state = Rc::clone(&self.random);
        let gaussian_state = Rc::clone(&self.random);

        vec![
            unary("deg", lib::deg),
            unary("rad", lib::rad),
            unary("sin", f64::sin),
            unary("asin", f64::asin),
            unary("cos", f64::cos),
            unary("acos", f64::acos),
            unary("tan", f64::tan),
            unary("atan", f64::atan),
            binary("atan2", f64::atan2),
            unary("sinh", f64::sinh),
            unary("asinh", f64::asinh),
            unary("cosh", f64::cosh),
            unary("acosh", f64::acosh),
            unary("tanh", f64::tanh),
            unary("atanh", f64::atanh),
            binary("pow", f64::powf),
            unary("exp", f64::exp),
            unary("exp2", f64::exp2),
            unary("exp10", |x| 10f64.powf(x)),
            unary("log", f64::log10),
            unary("ln", f64::ln),
            unary("log2", f64::log2),
            unary("log10", f64::log10),
            unary("sqrt", f64::sqrt),
            unary("cbrt", f64::cbrt),
            unary("abs", f64::abs),
            unary("sign", lib::sign),
            unary("fract", lib::fract),
            unary("int", lib::int),
            unary("ceil", f64::ceil),
            unary("floor", f64::floor),
            unary("round", f64::round),
            unary("rint", f64::round_ties_even),
            unary("trunc", f64::trunc),
            binary("mod", lib::modulo),
            variadic("min", lib::min),
            variadic("max", lib::max),
            variadic("sum", lib::sum),
            variadic("avg", lib::avg),
            variadic("med", lib::median),
            variadic("median", lib::median),
            ternary("clamp", lib::clamp),
            binary("step", lib::step),
            ternary("smoothstep", lib::smoothstep),
            ternary("mix", lib::mix),
            Function::new("seed", Arity::Fixed(1), move |args| {
                seed_state.borrow_mut().reseed(args[0]);
                0.0
            })
            .volatile(),
            Function::new("random", Arity::Fixed(0), move |_| {
                random_state.borrow_mut().uniform()
            })
            .volatile(),
            Function::new("gaussian", Arity::Fixed(0), move |_| {
                gaussian_state.borrow_mut().gaussian()
            })
            .volatile(),
        ]
    }
}

fn unary(name: &str, f: fn(f64) -> f64) -> Function {
    Function::new(name, Arity::Fixed(1), move |args| f(args[0]))
}

fn binary(name: &str, f: fn(f64, f64) -> f64) -> Function {
    Function::new(name, Arity::Fixed(2), move |args| f(args[0], args[1]))
}

fn ternary(name: &str, f: fn(f64, f64, f64) -> f64) -> Function {
    Function::new(name, Arity::Fixed(3), move |args| f(args[0], args[1], args[2]))
}

fn variadic(name: &str, f: fn(&[f64]) -> f64) -> Function {
    Function::new(name, Arity::Variadic, f)
}

impl SymbolTable for Registry {
    fn lookup(&self, name: &str) -> Option<Symbol> {
        self.symbols
            .get(name)
            .cloned()
            .or_else(|| self.variables.borrow().get(name).map(Symbol::Variable))
    }

    fn binary_operator(&self, symbol: &str) -> Option<Rc<BinaryOperator>> {
        self.binary_operators.get(symbol).cloned()
    }

    fn prefix_operator(&self, symbol: &str) -> Option<Rc<PrefixOperator>> {
        self.prefix_operators.get(symbol).cloned()
    }

    fn operator_symbols(&self) -> Vec<String> {
        self.binary_operators
            .keys()
            .chain(self.prefix_operators.keys())
            .cloned()
            .collect()
    }
}

impl VariableSource for Registry {
    fn get_or_create(&self, name: &str) -> Var {
        if let Some(Symbol::Variable(var)) = self.symbols.get(name) {
            return Rc::clone(var);
        }

        let mut table = self.variables.borrow_mut();
        if let Some(var) = table.get(name) {
            return var;
        }
        let var: Var = Rc::new(Cell::new(0.0));
        table.push(name, Rc::clone(&var));
        debug!(name, count = table.slots.len(), "created variable");
        var
    }
}
