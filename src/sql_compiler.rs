//! SQL compiler that turns a filter tree into a parameterized condition.
//!
//! Two outputs are available:
//! - [`SqlCompiler::compile`] renders the condition text itself, with generic `?`
//!   placeholders and the argument list in placeholder order;
//! - [`SqlCompiler::condition`] / [`SqlCompiler::select`] hand the tree to sea-query, which
//!   quotes identifiers and numbers placeholders for the configured backend.

use crate::ast::{BoolOp, Comparator, Expr, Predicate};
use crate::error::RewriteError;
use crate::placeholder::{count_placeholders, rewrite_placeholders, PlaceholderStyle, PLACEHOLDER};
use sea_query::{
    Alias, Asterisk, Cond, Condition, Expr as SqlExpr, MysqlQueryBuilder, PostgresQueryBuilder,
    SelectStatement, SimpleExpr, SqliteQueryBuilder, Value, Values,
};
use serde::{Deserialize, Serialize};

/// Condition text plus the arguments bound to its placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<String>,
}

impl Fragment {
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Numbers the placeholders with the given style.
    ///
    /// Fails if the text and the argument list have drifted apart, since the numbering would
    /// then bind values to the wrong columns.
    pub fn rewrite(self, style: PlaceholderStyle) -> Result<Fragment, RewriteError> {
        let placeholders = self.placeholder_count();
        if placeholders != self.args.len() {
            return Err(RewriteError::ArgumentMismatch {
                placeholders,
                args: self.args.len(),
            });
        }
        Ok(Fragment {
            sql: rewrite_placeholders(&self.sql, style),
            args: self.args,
        })
    }
}

/// Database flavour used when building full statements through sea-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

/// SQL Compiler that converts filter trees to SQL
#[derive(Debug, Clone, Default)]
pub struct SqlCompiler {
    backend: Backend,
}

impl SqlCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(backend: Backend) -> Self {
        Self { backend }
    }

    /// Renders `expr` as condition text with `?` placeholders.
    ///
    /// Every boolean node is wrapped in `( ... )`, children keep their order and operators are
    /// always spelled `AND` / `OR`. Predicates are written field first.
    pub fn compile(&self, expr: &Expr) -> Fragment {
        let mut fragment = Fragment::default();
        write_expr(expr, &mut fragment);
        tracing::debug!(args = fragment.args.len(), "compiled filter");
        fragment
    }

    /// Converts `expr` into a sea-query condition.
    pub fn condition(&self, expr: &Expr) -> Condition {
        match expr {
            Expr::Predicate(predicate) => Cond::all().add(compile_comparison(predicate)),
            Expr::Boolean(node) => {
                let cond = match node.op {
                    BoolOp::And => Cond::all(),
                    BoolOp::Or => Cond::any(),
                };
                node.children.iter().fold(cond, |cond, child| match child {
                    Expr::Predicate(predicate) => cond.add(compile_comparison(predicate)),
                    Expr::Boolean(_) => cond.add(self.condition(child)),
                })
            }
        }
    }

    /// Builds `SELECT * FROM <table> WHERE <filter>` for the configured backend.
    pub fn select(&self, table: &str, expr: &Expr) -> (String, Values) {
        let mut select = SelectStatement::new();
        select
            .column(Asterisk)
            .from(Alias::new(table))
            .cond_where(self.condition(expr));

        match self.backend {
            Backend::Postgres => select.build(PostgresQueryBuilder),
            Backend::Mysql => select.build(MysqlQueryBuilder),
            Backend::Sqlite => select.build(SqliteQueryBuilder),
        }
    }
}

fn write_expr(expr: &Expr, out: &mut Fragment) {
    match expr {
        Expr::Predicate(predicate) => {
            out.sql.push_str(&predicate.field);
            out.sql.push(' ');
            out.sql.push_str(predicate.comparator.as_str());
            out.sql.push(' ');
            out.sql.push(PLACEHOLDER);
            out.args.push(predicate.value.clone());
        }
        Expr::Boolean(node) => {
            out.sql.push('(');
            for (i, child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.sql.push(' ');
                    out.sql.push_str(node.op.as_sql());
                }
                out.sql.push(' ');
                write_expr(child, out);
            }
            out.sql.push_str(" )");
        }
    }
}

/// `table.column` becomes a qualified column, anything else a single quoted identifier.
fn column(field: &str) -> SqlExpr {
    match field.split_once('.') {
        Some((table, name)) if !table.is_empty() && !name.is_empty() && !name.contains('.') => {
            SqlExpr::col((Alias::new(table), Alias::new(name)))
        }
        _ => SqlExpr::col(Alias::new(field)),
    }
}

/// Compile a comparison operation
fn compile_comparison(predicate: &Predicate) -> SimpleExpr {
    let col = column(&predicate.field);
    let val = Value::String(Some(Box::new(predicate.value.clone())));

    match predicate.comparator {
        Comparator::Eq => col.eq(val),
        Comparator::NotEq => col.ne(val),
        Comparator::Gt => col.gt(val),
        Comparator::Lt => col.lt(val),
        Comparator::Gte => col.gte(val),
        Comparator::Lte => col.lte(val),
    }
}
