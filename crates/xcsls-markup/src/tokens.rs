use serde::Serialize;
use xcsls_source::Span;

/// The token vocabulary of the markup lexer.
///
/// `AttributeName` doubles as the kind for free text runs and quoted
/// attribute values (the token range of a quoted value includes both
/// quotes). `AttributeStringLiteral` is part of the wire vocabulary and
/// accepted by the builder, but the lexer itself never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    TagOpen,
    TagClose,
    TagName,
    AttributeName,
    AttributeEquals,
    AttributeStringLiteral,
    AttributeExpression,
    LeftParen,
    RightParen,
    Semicolon,
    Unknown,
}

/// A value-typed token. Offsets are absolute: the lexer adds its
/// `start_offset` to every span it emits. Tokens never own their text;
/// callers slice the backing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::from_bounds(start, end),
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}
