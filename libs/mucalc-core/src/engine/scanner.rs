//! Token scanner

use super::error::{ErrorCode, ParserError};
use logos::{Lexer, Logos};

/// Raw lexemes as recognised by the generated lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex(r"[0-9]+(\.[0-9]*)?", number)]
    #[regex(r"\.[0-9]+", number)]
    Number(f64),
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("||")]
    #[token("&&")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("<")]
    #[token(">")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("^")]
    #[token("=")]
    #[token("%")]
    Operator,
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
}

/// Decimal literal with an optional exponent. The exponent is only taken
/// when digits follow it, so `2e` scans as `2` and the identifier `e`.
fn number(lex: &mut Lexer<Lexeme>) -> Option<f64> {
    let rest = lex.remainder().as_bytes();
    if matches!(rest.first(), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(rest.get(1), Some(b'+' | b'-')));
        let digits = rest[1 + sign..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits > 0 {
            lex.bump(1 + sign + digits);
        }
    }
    lex.slice().parse().ok()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident,
    Operator,
    Open,
    Close,
    Comma,
    Question,
    Colon,
    End,
    /// Nothing recognisable starts here; the text is the rest of the input.
    Unknown,
}

impl From<Lexeme> for TokenKind {
    fn from(lexeme: Lexeme) -> Self {
        match lexeme {
            Lexeme::Number(value) => TokenKind::Number(value),
            Lexeme::Ident => TokenKind::Ident,
            Lexeme::Operator => TokenKind::Operator,
            Lexeme::Open => TokenKind::Open,
            Lexeme::Close => TokenKind::Close,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Question => TokenKind::Question,
            Lexeme::Colon => TokenKind::Colon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: usize,
}

/// Scanner over the padded input, i.e. the source followed by one blank.
pub(crate) struct Scanner<'src> {
    input: &'src str,
    lexer: Lexer<'src, Lexeme>,
    /// Operator spellings registered by the symbol table
    operators: Vec<String>,
    peeked: Option<Token>,
    exhausted: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(input: &'src str, extra_operators: Vec<String>) -> Self {
        Self {
            input,
            lexer: Lexeme::lexer(input),
            operators: extra_operators,
            peeked: None,
            exhausted: false,
        }
    }

    /// Length of the unpadded source.
    pub fn source_len(&self) -> usize {
        self.input.len().saturating_sub(1)
    }

    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.peeked.insert(token)
    }

    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> Token {
        let next = if self.exhausted {
            None
        } else {
            self.lexer.next()
        };
        let Some(result) = next else {
            return Token {
                kind: TokenKind::End,
                text: String::new(),
                pos: self.input.len(),
            };
        };

        let span = self.lexer.span();
        if let Some(len) = self.registered_operator(span.start, span.len(), result.is_err()) {
            self.lexer.bump(span.start + len - span.end);
            return Token {
                kind: TokenKind::Operator,
                text: self.input[span.start..span.start + len].to_string(),
                pos: span.start,
            };
        }

        match result {
            Ok(lexeme) => Token {
                kind: lexeme.into(),
                text: self.lexer.slice().to_string(),
                pos: span.start,
            },
            Err(()) => {
                self.exhausted = true;
                Token {
                    kind: TokenKind::Unknown,
                    text: self.input[span.start..].to_string(),
                    pos: span.start,
                }
            },
        }
    }

    /// Length of the longest registered operator at `start` that beats the
    /// lexeme just scanned there.
    fn registered_operator(&self, start: usize, scanned: usize, failed: bool) -> Option<usize> {
        let rest = &self.input[start..];
        self.operators
            .iter()
            .filter(|op| !op.is_empty() && rest.starts_with(op.as_str()))
            .map(String::len)
            .filter(|&len| len > scanned || (failed && len == scanned))
            .max()
    }
}

/// Error for a token that cannot appear where it was found.
pub(crate) fn unexpected_token(token: &Token, code_for_ident: ErrorCode) -> ParserError {
    let code = match token.kind {
        TokenKind::Number(_) => ErrorCode::UnexpectedValue,
        TokenKind::Ident => code_for_ident,
        TokenKind::Operator | TokenKind::Question => ErrorCode::UnexpectedOperator,
        TokenKind::Open | TokenKind::Close => ErrorCode::UnexpectedParens,
        TokenKind::Comma => ErrorCode::UnexpectedArgSeparator,
        TokenKind::Colon => ErrorCode::MisplacedColon,
        TokenKind::End => ErrorCode::UnexpectedEof,
        TokenKind::Unknown => ErrorCode::UnassignableToken,
    };
    ParserError::new(code, token.pos, token.text.clone())
}
