//! Precedence parser

use super::node::{AssignOp, BinaryOp, Node};
use super::scanner::{unexpected_token, Scanner, Token, TokenKind};
use super::{Arity, ErrorCode, Function, ParserError, Symbol, SymbolTable, VariableSource};
use std::rc::Rc;

/// Binding level of prefix operands: only `^` binds tighter than a sign.
const PREFIX_OPERAND_LEVEL: u8 = 7;

/// Deepest recursion of the parser. A parenthesis costs two levels, a prefix
/// sign or a right-hand `^` operand one.
pub(crate) const NESTING_LIMIT: usize = 256;

/// Tallest compiled tree. Evaluation recurses once per level.
pub(crate) const HEIGHT_LIMIT: usize = 1024;

type ParseResult<T> = Result<T, ParserError>;

enum Infix {
    Builtin(BinaryOp),
    Custom(Rc<super::BinaryOperator>),
}

impl Infix {
    fn level(&self) -> u8 {
        match self {
            Infix::Builtin(op) => op.level(),
            Infix::Custom(op) => op.precedence().level(),
        }
    }

    fn is_right_assoc(&self) -> bool {
        matches!(self, Infix::Builtin(op) if op.is_right_assoc())
    }
}

/// A parsed subtree and its height
struct Parsed {
    node: Node,
    height: usize,
}

impl Parsed {
    fn leaf(node: Node) -> Self {
        Self { node, height: 1 }
    }
}

pub(crate) struct Parser<'a, S> {
    scanner: Scanner<'a>,
    symbols: &'a S,
    depth: usize,
}

impl<'a, S> Parser<'a, S>
where
    S: SymbolTable + VariableSource,
{
    /// `input` is the source followed by one blank of padding.
    pub fn new(input: &'a str, symbols: &'a S) -> Self {
        Self {
            scanner: Scanner::new(input, symbols.operator_symbols()),
            symbols,
            depth: 0,
        }
    }

    /// `expr (',' expr)* END`
    pub fn parse(mut self) -> ParseResult<Vec<Node>> {
        let mut items = Vec::new();
        loop {
            items.push(self.parse_assignment()?.node);
            let token = self.scanner.next_token();
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::End => break,
                _ => return Err(self.unexpected(&token)),
            }
        }
        Ok(items)
    }

    fn parse_assignment(&mut self) -> ParseResult<Parsed> {
        self.descend(Self::assignment)
    }

    fn assignment(&mut self) -> ParseResult<Parsed> {
        let target = self.parse_ternary()?;

        let token = self.scanner.peek();
        let op = match token.kind {
            TokenKind::Operator => AssignOp::from_symbol(&token.text),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(target);
        };

        let token = self.scanner.next_token();
        match target.node {
            Node::Var(var) => {
                let value = self.parse_assignment()?;
                let height = value.height;
                Self::grow(Node::Assign(var, op, Box::new(value.node)), height, &token)
            },
            _ => Err(ParserError::new(
                ErrorCode::UnexpectedOperator,
                token.pos,
                token.text,
            )),
        }
    }

    fn parse_ternary(&mut self) -> ParseResult<Parsed> {
        let cond = self.parse_binary(0)?;
        if self.scanner.peek().kind != TokenKind::Question {
            return Ok(cond);
        }

        let question = self.scanner.next_token();
        let then = self.parse_assignment()?;
        let token = self.scanner.next_token();
        match token.kind {
            TokenKind::Colon => {
                let otherwise = self.parse_assignment()?;
                let below = cond.height.max(then.height).max(otherwise.height);
                let node = Node::ternary(cond.node, then.node, otherwise.node);
                Self::grow(node, below, &question)
            },
            TokenKind::End => Err(ParserError::new(
                ErrorCode::MissingElseClause,
                question.pos,
                question.text,
            )),
            _ => Err(self.unexpected(&token)),
        }
    }

    fn parse_binary(&mut self, min_level: u8) -> ParseResult<Parsed> {
        self.descend(|parser| parser.parse_operators(min_level))
    }

    /// Run `parse` one level deeper. Every recursive path of the grammar
    /// passes through here.
    fn descend<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= NESTING_LIMIT {
            let token = self.scanner.peek();
            return Err(ParserError::new(
                ErrorCode::NestingTooDeep,
                token.pos,
                token.text.clone(),
            ));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_operators(&mut self, min_level: u8) -> ParseResult<Parsed> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(op) = self.infix_operator() else {
                break;
            };
            let level = op.level();
            if level < min_level {
                break;
            }
            let token = self.scanner.next_token();

            let next_level = if op.is_right_assoc() { level } else { level + 1 };
            let rhs = self.parse_binary(next_level)?;
            let below = lhs.height.max(rhs.height);
            let node = match op {
                Infix::Builtin(op) => Node::binary(op, lhs.node, rhs.node),
                Infix::Custom(op) => Node::custom(op, lhs.node, rhs.node),
            };
            lhs = Self::grow(node, below, &token)?;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParseResult<Parsed> {
        let token = self.scanner.peek();
        if token.kind != TokenKind::Operator {
            return self.parse_primary();
        }

        if token.text == "-" {
            let token = self.scanner.next_token();
            let operand = self.parse_binary(PREFIX_OPERAND_LEVEL)?;
            return Self::grow(Node::neg(operand.node), operand.height, &token);
        }
        if let Some(op) = self.symbols.prefix_operator(&token.text) {
            let token = self.scanner.next_token();
            let operand = self.parse_binary(PREFIX_OPERAND_LEVEL)?;
            return Self::grow(Node::prefix(op, operand.node), operand.height, &token);
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Parsed> {
        let token = self.scanner.next_token();
        match token.kind {
            TokenKind::Number(value) => Ok(Parsed::leaf(Node::Const(value))),
            TokenKind::Ident => match self.symbols.lookup(&token.text) {
                Some(Symbol::Constant(value)) => Ok(Parsed::leaf(Node::Const(value))),
                Some(Symbol::Variable(var)) => Ok(Parsed::leaf(Node::Var(var))),
                Some(Symbol::Function(function)) => self.parse_call(function, token),
                None => Ok(Parsed::leaf(Node::Var(
                    self.symbols.get_or_create(&token.text),
                ))),
            },
            TokenKind::Open => {
                let inner = self.parse_assignment()?;
                let close = self.scanner.next_token();
                match close.kind {
                    TokenKind::Close => Ok(inner),
                    TokenKind::End => Err(self.missing_parens()),
                    _ => Err(self.unexpected(&close)),
                }
            },
            _ => Err(self.unexpected(&token)),
        }
    }

    fn parse_call(&mut self, function: Rc<Function>, name: Token) -> ParseResult<Parsed> {
        let open = self.scanner.next_token();
        if open.kind != TokenKind::Open {
            return Err(self.unexpected(&open));
        }

        let mut args = Vec::new();
        let mut below = 0;
        if self.scanner.peek().kind == TokenKind::Close {
            self.scanner.next_token();
        } else {
            loop {
                let arg = self.parse_assignment()?;
                below = below.max(arg.height);
                args.push(arg.node);
                let token = self.scanner.next_token();
                match token.kind {
                    TokenKind::Comma => continue,
                    TokenKind::Close => break,
                    TokenKind::End => return Err(self.missing_parens()),
                    _ => return Err(self.unexpected(&token)),
                }
            }
        }

        let (too_few, too_many) = match function.arity() {
            Arity::Fixed(n) => (args.len() < n, args.len() > n),
            Arity::Variadic => (args.is_empty(), false),
        };
        if too_few {
            return Err(ParserError::new(ErrorCode::TooFewParams, name.pos, name.text));
        }
        if too_many {
            return Err(ParserError::new(ErrorCode::TooManyParams, name.pos, name.text));
        }

        Self::grow(Node::call(function, args), below, &name)
    }

    /// Wrap `node`, built over children at most `below` high. Folded
    /// constants are leaves again.
    fn grow(node: Node, below: usize, at: &Token) -> ParseResult<Parsed> {
        if matches!(node, Node::Const(_)) {
            return Ok(Parsed::leaf(node));
        }
        let height = below + 1;
        if height > HEIGHT_LIMIT {
            return Err(ParserError::new(
                ErrorCode::NestingTooDeep,
                at.pos,
                at.text.clone(),
            ));
        }
        Ok(Parsed { node, height })
    }

    fn infix_operator(&mut self) -> Option<Infix> {
        let token = self.scanner.peek();
        if token.kind != TokenKind::Operator {
            return None;
        }
        if let Some(op) = BinaryOp::from_symbol(&token.text) {
            return Some(Infix::Builtin(op));
        }
        self.symbols.binary_operator(&token.text).map(Infix::Custom)
    }

    fn missing_parens(&self) -> ParserError {
        ParserError::new(ErrorCode::MissingParens, self.scanner.source_len(), ")")
    }

    fn unexpected(&self, token: &Token) -> ParserError {
        let code_for_ident = match self.symbols.lookup(&token.text) {
            Some(Symbol::Function(_)) => ErrorCode::UnexpectedFunction,
            Some(Symbol::Constant(_)) => ErrorCode::UnexpectedValue,
            _ => ErrorCode::UnexpectedVariable,
        };
        unexpected_token(token, code_for_ident)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::super::{
        BinaryOperator, Expression, Precedence, PrefixOperator, Var,
    };
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    /// Minimal symbol table: `pi`, `sin`, `max`, `%` and implicit variables.
    #[derive(Default)]
    struct TestSymbols {
        vars: RefCell<HashMap<String, Var>>,
        created: Cell<usize>,
    }

    impl SymbolTable for TestSymbols {
        fn lookup(&self, name: &str) -> Option<Symbol> {
            match name {
                "pi" => Some(Symbol::Constant(std::f64::consts::PI)),
                "sin" => Some(Symbol::Function(Rc::new(Function::new(
                    "sin",
                    Arity::Fixed(1),
                    |a| a[0].sin(),
                )))),
                "max" => Some(Symbol::Function(Rc::new(Function::new(
                    "max",
                    Arity::Variadic,
                    |a| a.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                )))),
                _ => self.vars.borrow().get(name).cloned().map(Symbol::Variable),
            }
        }

        fn binary_operator(&self, symbol: &str) -> Option<Rc<BinaryOperator>> {
            (symbol == "%").then(|| {
                Rc::new(BinaryOperator::new("%", Precedence::Multiplicative, |a, b| {
                    a - b * (a / b).floor()
                }))
            })
        }

        fn prefix_operator(&self, symbol: &str) -> Option<Rc<PrefixOperator>> {
            (symbol == "+").then(|| Rc::new(PrefixOperator::new("+", |v| v)))
        }

        fn operator_symbols(&self) -> Vec<String> {
            vec!["%".to_string()]
        }
    }

    impl VariableSource for TestSymbols {
        fn get_or_create(&self, name: &str) -> Var {
            self.vars
                .borrow_mut()
                .entry(name.to_string())
                .or_insert_with(|| {
                    self.created.set(self.created.get() + 1);
                    Rc::new(Cell::new(0.0))
                })
                .clone()
        }
    }

    fn eval(source: &str, symbols: &TestSymbols) -> Vec<f64> {
        Expression::parse(source, symbols).unwrap().eval()
    }

    fn error(source: &str) -> ParserError {
        Expression::parse(source, &TestSymbols::default()).unwrap_err()
    }

    #[test]
    fn test_precedence() {
        let s = TestSymbols::default();
        assert_eq!(eval("2 + 3 * 4", &s), vec![14.0]);
        assert_eq!(eval("(2 + 3) * 4", &s), vec![20.0]);
        assert_eq!(eval("-2^2", &s), vec![-4.0]);
        assert_eq!(eval("2^3^2", &s), vec![512.0]);
        assert_eq!(eval("2^-1", &s), vec![0.5]);
        assert_eq!(eval("10 - 4 - 3", &s), vec![3.0]);
        assert_eq!(eval("7 % 3 * 2", &s), vec![2.0]);
        assert_eq!(eval("1 + 2 < 4 && 3 != 3 || 1", &s), vec![1.0]);
    }

    #[test]
    fn test_prefix_plus_and_minus() {
        let s = TestSymbols::default();
        assert_eq!(eval("+5", &s), vec![5.0]);
        assert_eq!(eval("2--3", &s), vec![5.0]);
        assert_eq!(eval("-(1+2)*2", &s), vec![-6.0]);
    }

    #[test]
    fn test_multiple_results() {
        let s = TestSymbols::default();
        assert_eq!(eval("1, 2+2, max(1, 9, 3)", &s), vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_assignment_and_implicit_variables() {
        let s = TestSymbols::default();
        assert_eq!(eval("a = 2^3 + 2", &s), vec![10.0]);
        assert_eq!(eval("a * 2", &s), vec![20.0]);
        assert_eq!(eval("a += 1, a", &s), vec![11.0, 11.0]);
        assert_eq!(eval("b", &s), vec![0.0]);
        assert_eq!(s.created.get(), 2);
    }

    #[test]
    fn test_ternary() {
        let s = TestSymbols::default();
        assert_eq!(eval("1 ? 2 : 3", &s), vec![2.0]);
        assert_eq!(eval("x = 0, x ? 2 : 3", &s), vec![0.0, 3.0]);
        assert_eq!(eval("0 ? 1 : 0 ? 2 : 4", &s), vec![4.0]);
    }

    #[test]
    fn test_constant_folding() {
        let s = TestSymbols::default();
        assert!(Expression::parse("sin(pi/2) * 3", &s).unwrap().is_constant());
        assert!(!Expression::parse("sin(y)", &s).unwrap().is_constant());
    }

    #[test]
    fn test_error_positions() {
        let err = error("2+");
        assert_eq!(err.code, ErrorCode::UnexpectedEof);
        assert_eq!(err.pos, 3);

        let err = error("2+*3");
        assert_eq!(err.code, ErrorCode::UnexpectedOperator);
        assert_eq!((err.pos, err.token.as_str()), (2, "*"));

        let err = error("2 3");
        assert_eq!(err.code, ErrorCode::UnexpectedValue);
        assert_eq!(err.pos, 2);

        let err = error("(1+2");
        assert_eq!(err.code, ErrorCode::MissingParens);
        assert_eq!(err.pos, 4);

        let err = error("sin(1, 2)");
        assert_eq!(err.code, ErrorCode::TooManyParams);
        assert_eq!(err.token, "sin");

        let err = error("sin()");
        assert_eq!(err.code, ErrorCode::TooFewParams);

        let err = error("1 ? 2");
        assert_eq!(err.code, ErrorCode::MissingElseClause);

        let err = error("1 : 2");
        assert_eq!(err.code, ErrorCode::MisplacedColon);

        let err = error("3 = 4");
        assert_eq!(err.code, ErrorCode::UnexpectedOperator);
        assert_eq!((err.pos, err.token.as_str()), (2, "="));

        let err = error("1 # 2");
        assert_eq!(err.code, ErrorCode::UnassignableToken);
        assert_eq!(err.token, "# 2 ");
    }

    #[test]
    fn test_unexpected_identifier_kinds() {
        assert_eq!(error("2 sin(1)").code, ErrorCode::UnexpectedFunction);
        assert_eq!(error("2 pi").code, ErrorCode::UnexpectedValue);
        assert_eq!(error("2 q").code, ErrorCode::UnexpectedVariable);
        assert_eq!(error("q(1)").code, ErrorCode::UnexpectedParens);
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let source = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = error(&source);
        assert_eq!(err.code, ErrorCode::NestingTooDeep);
        assert_eq!((err.pos, err.token.as_str()), (NESTING_LIMIT / 2, "("));

        let s = TestSymbols::default();
        let source = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&source, &s), vec![1.0]);
    }

    #[test]
    fn test_deep_prefix_and_power_chains_are_rejected() {
        let source = format!("{}1", "-".repeat(10_000));
        assert_eq!(error(&source).code, ErrorCode::NestingTooDeep);

        let source = format!("2{}", "^2".repeat(10_000));
        assert_eq!(error(&source).code, ErrorCode::NestingTooDeep);

        let source = format!("{}x", "x = ".repeat(10_000));
        assert_eq!(error(&source).code, ErrorCode::NestingTooDeep);

        let source = format!("{}2", "1 ? 1 : ".repeat(10_000));
        assert_eq!(error(&source).code, ErrorCode::NestingTooDeep);

        let s = TestSymbols::default();
        assert_eq!(eval(&format!("{}1", "-".repeat(100)), &s), vec![1.0]);
    }

    #[test]
    fn test_tall_trees_are_rejected() {
        let s = TestSymbols::default();
        eval("x = 1", &s);
        let sum = format!("x{}", "+x".repeat(999));
        assert_eq!(eval(&sum, &s), vec![1000.0]);

        let source = format!("x{}", "+x".repeat(HEIGHT_LIMIT));
        let err = Expression::parse(&source, &s).unwrap_err();
        assert_eq!((err.code, err.token.as_str()), (ErrorCode::NestingTooDeep, "+"));

        let folded = format!("1{}", "+1".repeat(5_000));
        assert_eq!(eval(&folded, &s), vec![5001.0]);
    }

    #[test]
    fn test_variable_created_before_later_error() {
        let s = TestSymbols::default();
        assert!(Expression::parse("fresh +", &s).is_err());
        assert!(s.vars.borrow().contains_key("fresh"));
    }
}
