//! Compiles filter queries such as
//! `Age >= "18" && ( Status = "active" || Status = "pending" )`
//! into a parameterized SQL condition.
//!
//! Field names are checked against a caller-supplied allow-list while scanning, and literal
//! values only ever travel as bound arguments, so the condition text cannot be used for
//! injection.
//!
//! ```
//! use fql_compiler::{compile, FieldAllowList, PlaceholderStyle};
//!
//! let fields = FieldAllowList::new(["Age", "Status"]);
//! let fragment = compile(r#"Age >= "18" && ( Status = "active" || Status = "pending" )"#, &fields)?;
//! assert_eq!(fragment.sql, "( Age >= ? AND ( Status = ? OR Status = ? ) )");
//! assert_eq!(fragment.args, ["18", "active", "pending"]);
//!
//! let fragment = fragment.rewrite(PlaceholderStyle::Dollar)?;
//! assert_eq!(fragment.sql, "( Age >= $1 AND ( Status = $2 OR Status = $3 ) )");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod placeholder;
pub mod sql_compiler;
pub mod token;

pub use ast::{BoolOp, BooleanNode, Comparator, Expr, Predicate};
pub use config::{FieldAllowList, FilterConfig};
pub use error::{CompileError, ConfigError, LexicalError, RewriteError, SyntaxError};
pub use placeholder::{rewrite_placeholders, PlaceholderStyle};
pub use sql_compiler::{Backend, Fragment, SqlCompiler};

use lexer::Lexer;

/// Scans and parses `input` into a filter tree.
pub fn parse_filter(input: &str, allowed: &FieldAllowList) -> Result<Expr, CompileError> {
    parser::parse(Lexer::new(input, allowed))
}

/// Compiles `input` into condition text with `?` placeholders and its bound arguments.
pub fn compile(input: &str, allowed: &FieldAllowList) -> Result<Fragment, CompileError> {
    let expr = parse_filter(input, allowed)?;
    Ok(SqlCompiler::new().compile(&expr))
}

/// Compiles `input` with the configured allow-list and numbers the placeholders in the
/// configured style.
pub fn compile_with(input: &str, config: &FilterConfig) -> Result<Fragment, CompileError> {
    let fragment = compile(input, &config.allowed_fields)?;
    Ok(fragment.rewrite(config.placeholder_style)?)
}
