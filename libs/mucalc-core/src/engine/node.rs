//! Compiled expression tree

use super::parser::Parser;
use super::{BinaryOperator, Function, ParserError, PrefixOperator, SymbolTable, Var, VariableSource};
use std::rc::Rc;

/// Built-in binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "||" => Self::Or,
            "&&" => Self::And,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Le,
            ">=" => Self::Ge,
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "^" => Self::Pow,
            _ => return None,
        };
        Some(op)
    }

    pub fn level(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Gt | Self::Le | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div => 6,
            Self::Pow => 7,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        self == Self::Pow
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        let truth = |cond: bool| if cond { 1.0 } else { 0.0 };
        match self {
            Self::Or => truth(a != 0.0 || b != 0.0),
            Self::And => truth(a != 0.0 && b != 0.0),
            Self::Eq => truth(a == b),
            Self::Ne => truth(a != b),
            Self::Lt => truth(a < b),
            Self::Gt => truth(a > b),
            Self::Le => truth(a <= b),
            Self::Ge => truth(a >= b),
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Pow => a.powf(b),
        }
    }
}

/// Assignment flavours: `=`, `+=`, `-=`, `*=`, `/=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
}

impl AssignOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "=" => Self::Set,
            "+=" => Self::Add,
            "-=" => Self::Sub,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            _ => return None,
        };
        Some(op)
    }

    fn apply(self, current: f64, value: f64) -> f64 {
        match self {
            Self::Set => value,
            Self::Add => current + value,
            Self::Sub => current - value,
            Self::Mul => current * value,
            Self::Div => current / value,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Const(f64),
    Var(Var),
    Neg(Box<Node>),
    Prefix(Rc<PrefixOperator>, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Custom(Rc<BinaryOperator>, Box<Node>, Box<Node>),
    Call(Rc<Function>, Vec<Node>),
    Ternary(Box<Node>, Box<Node>, Box<Node>),
    Assign(Var, AssignOp, Box<Node>),
}

impl Node {
    // The constructors below fold constant operands as the tree is built.

    pub fn neg(operand: Node) -> Node {
        match operand {
            Node::Const(v) => Node::Const(-v),
            operand => Node::Neg(Box::new(operand)),
        }
    }

    pub fn prefix(op: Rc<PrefixOperator>, operand: Node) -> Node {
        match operand {
            Node::Const(v) => Node::Const(op.apply(v)),
            operand => Node::Prefix(op, Box::new(operand)),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Node {
        match (lhs, rhs) {
            (Node::Const(a), Node::Const(b)) => Node::Const(op.apply(a, b)),
            (lhs, rhs) => Node::Binary(op, Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn custom(op: Rc<BinaryOperator>, lhs: Node, rhs: Node) -> Node {
        match (lhs, rhs) {
            (Node::Const(a), Node::Const(b)) => Node::Const(op.apply(a, b)),
            (lhs, rhs) => Node::Custom(op, Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn call(function: Rc<Function>, args: Vec<Node>) -> Node {
        if !function.is_volatile() {
            let constants: Option<Vec<f64>> = args.iter().map(Node::constant).collect();
            if let Some(values) = constants {
                return Node::Const(function.call(&values));
            }
        }
        Node::Call(function, args)
    }

    pub fn ternary(cond: Node, then: Node, otherwise: Node) -> Node {
        match cond {
            Node::Const(c) if c != 0.0 => then,
            Node::Const(_) => otherwise,
            cond => Node::Ternary(Box::new(cond), Box::new(then), Box::new(otherwise)),
        }
    }

    fn constant(&self) -> Option<f64> {
        match self {
            Node::Const(v) => Some(*v),
            _ => None,
        }
    }

    fn eval(&self) -> f64 {
        match self {
            Node::Const(v) => *v,
            Node::Var(var) => var.get(),
            Node::Neg(operand) => -operand.eval(),
            Node::Prefix(op, operand) => op.apply(operand.eval()),
            Node::Binary(op, lhs, rhs) => op.apply(lhs.eval(), rhs.eval()),
            Node::Custom(op, lhs, rhs) => op.apply(lhs.eval(), rhs.eval()),
            Node::Call(function, args) => {
                let values: Vec<f64> = args.iter().map(Node::eval).collect();
                function.call(&values)
            },
            Node::Ternary(cond, then, otherwise) => {
                if cond.eval() != 0.0 {
                    then.eval()
                } else {
                    otherwise.eval()
                }
            },
            Node::Assign(var, op, value) => {
                let result = op.apply(var.get(), value.eval());
                var.set(result);
                result
            },
        }
    }
}

/// A compiled, possibly comma-separated, expression
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    items: Vec<Node>,
}

impl Expression {
    /// Compile `source` against `symbols`.
    ///
    /// Unknown identifiers are bound through [`VariableSource::get_or_create`]
    /// as soon as the scanner reaches them, so a variable may be created even
    /// when a later token makes the expression invalid.
    pub fn parse<S>(source: &str, symbols: &S) -> Result<Self, ParserError>
    where
        S: SymbolTable + VariableSource,
    {
        let input = format!("{} ", source);
        let items = Parser::new(&input, symbols).parse()?;
        Ok(Self {
            source: source.to_string(),
            items,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of comma-separated results.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when every result was folded to a constant at compile time.
    pub fn is_constant(&self) -> bool {
        self.items.iter().all(|node| node.constant().is_some())
    }

    /// Evaluate every result, left to right.
    pub fn eval(&self) -> Vec<f64> {
        self.items.iter().map(Node::eval).collect()
    }
}
