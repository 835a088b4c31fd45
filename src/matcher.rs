//! In-memory evaluation of a filter tree against JSON records.
//!
//! The comparison always reads `field <comparator> literal`, the same way the generated SQL
//! reads, so a record selected here is a record the database would select.

use crate::ast::{BoolOp, Comparator, Expr, Predicate};
use serde_json::Value;
use std::cmp::Ordering;

impl Expr {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Expr::Predicate(predicate) => predicate.matches(record),
            Expr::Boolean(node) => match node.op {
                BoolOp::And => node.children.iter().all(|child| child.matches(record)),
                BoolOp::Or => node.children.iter().any(|child| child.matches(record)),
            },
        }
    }
}

impl Predicate {
    /// Missing fields, `null`, arrays and objects never match.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(actual) = lookup(record, &self.field) else {
            return false;
        };

        match actual {
            Value::Number(number) => {
                let (Some(lhs), Ok(rhs)) = (number.as_f64(), self.value.trim().parse::<f64>())
                else {
                    return false;
                };
                lhs.partial_cmp(&rhs)
                    .is_some_and(|ordering| self.comparator.holds(ordering))
            }
            Value::String(s) => self.comparator.holds(s.as_str().cmp(self.value.as_str())),
            Value::Bool(b) => match (self.comparator, self.value.parse::<bool>()) {
                (Comparator::Eq, Ok(literal)) => *b == literal,
                (Comparator::NotEq, Ok(literal)) => *b != literal,
                _ => false,
            },
            Value::Null | Value::Array(_) | Value::Object(_) => false,
        }
    }
}

impl Comparator {
    /// Whether `lhs.cmp(rhs) == ordering` satisfies this comparator.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparator::Eq => ordering == Ordering::Equal,
            Comparator::NotEq => ordering != Ordering::Equal,
            Comparator::Lt => ordering == Ordering::Less,
            Comparator::Lte => ordering != Ordering::Greater,
            Comparator::Gt => ordering == Ordering::Greater,
            Comparator::Gte => ordering != Ordering::Less,
        }
    }
}

/// A key spelled exactly like the field wins; otherwise the dotted path is walked through
/// nested objects.
fn lookup<'v>(record: &'v Value, field: &str) -> Option<&'v Value> {
    if let Some(value) = record.get(field) {
        return Some(value);
    }
    field
        .split('.')
        .try_fold(record, |value, segment| value.get(segment))
}
