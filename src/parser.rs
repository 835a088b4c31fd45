//! Filter的语法分析器
//!
//! ## 解析流程图
//!
//! ```text
//! parse()
//!   └─ parse_boolean(root: AND)          隐式的顶层 AND 节点
//!        ├─ BooleanOperator → 设置/覆盖当前节点的运算符
//!        ├─ '('  → parse_boolean(新节点) 直到匹配的 ')'，作为子节点追加
//!        ├─ ')'  → 结束当前层递归
//!        ├─ Field / Literal → parse_predicate()
//!        │                     └─ 再取两个 token：
//!        │                          field comparator literal
//!        │                          literal comparator field
//!        └─ 其他 → 语法错误
//! ```
//!
//! ## 运算符语义
//!
//! 同一个布尔节点的所有子节点共享同一个运算符（最后出现的那个），
//! 没有 AND/OR 优先级，混合使用时只能靠括号分组：
//!
//! ```text
//! A = "1" && ( B = "2" || C = "3" )   →   ( A = ? AND ( B = ? OR C = ? ) )
//! A = "1"    B = "2"                  →   ( A = ? AND B = ? )      隐式 AND
//! ```

use crate::ast::{BoolOp, BooleanNode, Comparator, Expr, Predicate};
use crate::error::{CompileError, LexicalError, SyntaxError};
use crate::token::{Token, TokenKind};

/// 括号嵌套的最大深度，防止恶意输入导致栈溢出
pub const MAX_NESTING_DEPTH: usize = 64;

/// 一层递归结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    CloseGroup,
    Eof,
}

pub struct Parser<I> {
    tokens: I,
    depth: usize,
}

/// 解析 token 流，返回表达式树
pub fn parse<'a, T>(tokens: T) -> Result<Expr, CompileError>
where
    T: IntoIterator<Item = Token<'a>>,
{
    Parser::new(tokens.into_iter()).parse()
}

impl<'a, I> Parser<I>
where
    I: Iterator<Item = Token<'a>>,
{
    pub fn new(tokens: I) -> Self {
        Self { tokens, depth: 0 }
    }

    /// 取下一个 token，词法错误 token 直接转换为错误返回
    fn advance(&mut self) -> Result<Option<Token<'a>>, CompileError> {
        match self.tokens.next() {
            Some(token) if token.is_error() => Err(LexicalError {
                message: token.text.into_owned(),
            }
            .into()),
            other => Ok(other),
        }
    }

    /// 期望还有 token，否则返回 "unexpected end of input"
    fn expect_token(&mut self) -> Result<Token<'a>, CompileError> {
        self.advance()?
            .ok_or_else(|| SyntaxError::UnexpectedEof.into())
    }

    pub fn parse(&mut self) -> Result<Expr, CompileError> {
        let mut root = BooleanNode::new(BoolOp::And, Vec::new());

        if self.parse_boolean(&mut root)? == Terminator::CloseGroup {
            return Err(SyntaxError::UnmatchedCloseGroup.into());
        }
        if root.children.is_empty() {
            return Err(SyntaxError::EmptyFilter.into());
        }

        tracing::debug!(children = root.children.len(), op = %root.op, "parsed filter");

        // 整个输入被一对括号包住时，直接以该分组作为根节点
        if root.children.len() == 1 && matches!(root.children[0], Expr::Boolean(_)) {
            if let Some(group) = root.children.pop() {
                return Ok(group);
            }
        }
        Ok(Expr::Boolean(root))
    }

    /// 解析一个布尔节点的子节点，直到 ')' 或输入结束
    fn parse_boolean(&mut self, node: &mut BooleanNode) -> Result<Terminator, CompileError> {
        while let Some(token) = self.advance()? {
            match token.kind {
                TokenKind::BooleanOperator => {
                    node.op = token
                        .text
                        .parse::<BoolOp>()
                        .map_err(|e| SyntaxError::UnknownOperator(e.0))?;
                }
                TokenKind::OpenGroup => {
                    let group = self.parse_group()?;
                    node.children.push(Expr::Boolean(group));
                }
                TokenKind::CloseGroup => return Ok(Terminator::CloseGroup),
                TokenKind::Field | TokenKind::Literal => {
                    let predicate = self.parse_predicate(token)?;
                    node.children.push(Expr::Predicate(predicate));
                }
                TokenKind::Comparator => {
                    return Err(SyntaxError::UnexpectedToken(describe(&token)).into());
                }
                TokenKind::Error => unreachable!("advance returns error tokens as Err"),
            }
        }
        Ok(Terminator::Eof)
    }

    /// 解析括号分组，开始的 '(' 已经被调用者消费
    fn parse_group(&mut self) -> Result<BooleanNode, CompileError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep(MAX_NESTING_DEPTH).into());
        }
        self.depth += 1;

        let mut group = BooleanNode::new(BoolOp::And, Vec::new());
        let terminator = self.parse_boolean(&mut group)?;
        self.depth -= 1;

        if terminator == Terminator::Eof {
            return Err(SyntaxError::UnclosedGroup.into());
        }
        if group.children.is_empty() {
            return Err(SyntaxError::EmptyGroup.into());
        }
        Ok(group)
    }

    /// 以第一个操作数为起点，再读取两个 token 组成一个比较
    fn parse_predicate(&mut self, first: Token<'a>) -> Result<Predicate, CompileError> {
        let comparator = self.expect_token()?;
        let second = self.expect_token()?;

        let (field, literal) = match (first.kind, comparator.kind, second.kind) {
            (TokenKind::Field, TokenKind::Comparator, TokenKind::Literal) => (first, second),
            (TokenKind::Literal, TokenKind::Comparator, TokenKind::Field) => (second, first),
            _ => {
                return Err(SyntaxError::MalformedPredicate(format!(
                    "{} {} {}",
                    describe(&first),
                    describe(&comparator),
                    describe(&second)
                ))
                .into());
            }
        };

        let comparator = comparator
            .text
            .parse::<Comparator>()
            .map_err(|e| SyntaxError::UnknownComparator(e.0))?;

        Ok(Predicate::new(
            field.text.into_owned(),
            comparator,
            literal.text.into_owned(),
        ))
    }
}

fn describe(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::OpenGroup | TokenKind::CloseGroup => token.kind.to_string(),
        kind => format!("{kind} {:?}", token.text),
    }
}
