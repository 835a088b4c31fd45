//! The token definition for the filter language.

use std::borrow::Cow;
use std::fmt;

/// A token is a single unit of the language: its kind plus the raw text it was scanned from.
///
/// Literal tokens carry their value with the surrounding quotes already stripped,
/// error tokens carry a human-readable message instead of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: Cow<'a, str>,
}

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    OpenGroup,  // (
    CloseGroup, // )

    // Operators
    BooleanOperator, // && || AND OR
    Comparator,      // = != < <= > >=

    // Operands
    Literal, // "quoted value"
    Field,   // allow-listed identifier

    // Special
    Error, // Lexical error; the text is the message
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(TokenKind::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.kind == TokenKind::Error
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::OpenGroup => "'('",
            TokenKind::CloseGroup => "')'",
            TokenKind::BooleanOperator => "boolean operator",
            TokenKind::Comparator => "comparator",
            TokenKind::Literal => "literal",
            TokenKind::Field => "field",
            TokenKind::Error => "error",
        };
        f.write_str(name)
    }
}
