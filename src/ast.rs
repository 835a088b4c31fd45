use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 过滤表达式树的节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    /// 单个比较，例如 `Age >= "18"`
    Predicate(Predicate),
    /// 对子表达式的 AND / OR 组合
    Boolean(BooleanNode),
}

/// 原子比较：字段、比较运算符、字面值（不带引号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    pub field: String,
    pub comparator: Comparator,
    pub value: String,
}

/// 布尔节点，children 在成功构建后永远非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BooleanNode {
    pub op: BoolOp,
    pub children: Vec<Expr>,
}

/// 布尔运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoolOp {
    #[default]
    And, // && / AND
    Or, // || / OR
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Comparator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl Predicate {
    pub fn new(field: impl Into<String>, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            comparator,
            value: value.into(),
        }
    }
}

impl BooleanNode {
    pub fn new(op: BoolOp, children: Vec<Expr>) -> Self {
        Self { op, children }
    }
}

impl From<Predicate> for Expr {
    fn from(predicate: Predicate) -> Self {
        Expr::Predicate(predicate)
    }
}

impl From<BooleanNode> for Expr {
    fn from(node: BooleanNode) -> Self {
        Expr::Boolean(node)
    }
}

impl BoolOp {
    /// SQL spelling, independent of how the operator was written in the filter.
    pub fn as_sql(self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

/// The operator spelling was neither `&&`/`AND` nor `||`/`OR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSpelling(pub String);

impl FromStr for BoolOp {
    type Err = UnknownSpelling;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "&&" => Ok(BoolOp::And),
            "||" => Ok(BoolOp::Or),
            _ if s.eq_ignore_ascii_case("and") => Ok(BoolOp::And),
            _ if s.eq_ignore_ascii_case("or") => Ok(BoolOp::Or),
            _ => Err(UnknownSpelling(s.to_string())),
        }
    }
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::NotEq => "!=",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }
}

impl FromStr for Comparator {
    type Err = UnknownSpelling;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Comparator::Eq),
            "!=" => Ok(Comparator::NotEq),
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::Lte),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Gte),
            _ => Err(UnknownSpelling(s.to_string())),
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
