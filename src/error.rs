//! Error types for the filter pipeline.

use thiserror::Error;

/// The scanner rejected the input. The message names the offending text verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lexical error: {message}")]
pub struct LexicalError {
    pub message: String,
}

/// The token stream does not form a valid filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("{0:?} is an invalid operation")]
    UnknownOperator(String),
    #[error("{0:?} is not a supported comparator")]
    UnknownComparator(String),
    #[error("a predicate needs one field, one comparator and one literal, found {0}")]
    MalformedPredicate(String),
    #[error("unmatched ')'")]
    UnmatchedCloseGroup,
    #[error("groups nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("'(' is never closed")]
    UnclosedGroup,
    #[error("empty group '()'")]
    EmptyGroup,
    #[error("filter is empty")]
    EmptyFilter,
}

/// Error returned by [`crate::compile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Error returned when numbering the placeholders of a compiled fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("fragment has {placeholders} placeholders but {args} arguments")]
    ArgumentMismatch { placeholders: usize, args: usize },
}

/// Error returned when loading a [`crate::config::FilterConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown placeholder style {0:?}")]
    UnknownStyle(String),
}
