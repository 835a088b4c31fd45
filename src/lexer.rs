//! Filter的词法分析器
//!
//! 词法分析阶段同时完成字段名校验：任何被识别为字段的标识符都必须在白名单中，
//! 字面量则不做校验（它们只会作为绑定参数出现，不会拼接进 SQL 文本）。

use crate::config::FieldAllowList;
use crate::token::{Token, TokenKind};
use std::iter::FusedIterator;

pub struct Lexer<'a> {
    input: &'a str,
    /// 输入字符串中的当前位置（字节索引）
    position: usize,
    fields: &'a FieldAllowList,
    /// 输入结束或已产生错误 token 后置位，之后不再产生 token
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, fields: &'a FieldAllowList) -> Self {
        Lexer {
            input,
            position: 0,
            fields,
            finished: false,
        }
    }

    /// 返回当前位置的字符，不推进位置
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// 推进位置一个字符并返回该字符
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// 跳过空白字符
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn slice(&self, start: usize) -> &'a str {
        &self.input[start..self.position]
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token<'a> {
        Token::new(kind, self.slice(start))
    }

    /// 读取双引号包围的字面量，产生的 token 不包含引号
    /// 注意：开始的引号已经被调用者消费
    fn read_literal(&mut self, start: usize) -> Token<'a> {
        let content_start = self.position;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            self.bump();
        }
        let content_end = self.position;

        if self.bump().is_none() {
            return Token::error(format!("unterminated literal {}", self.slice(start)));
        }

        Token::new(TokenKind::Literal, &self.input[content_start..content_end])
    }

    /// 读取布尔运算符，`&` 和 `|` 必须成对出现
    fn read_boolean(&mut self, first: char, start: usize) -> Token<'a> {
        match self.bump() {
            Some(second) if second == first => self.token(TokenKind::BooleanOperator, start),
            _ => Token::error(format!(
                "invalid boolean expression, {:?}",
                self.slice(start)
            )),
        }
    }

    /// 读取比较运算符，所有双字符比较运算符都以 `=` 结尾
    fn read_comparator(&mut self, start: usize) -> Token<'a> {
        if self.peek() == Some('=') {
            self.bump();
        }
        self.token(TokenKind::Comparator, start)
    }

    /// 读取标识符并与白名单比对
    /// 首字符任意，其后贪婪读取字母、数字和 `.`（用于 `Data.Value` 这样的路径）
    /// 注意：首字符已经被调用者消费
    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if is_identifier_char(c) {
                self.bump();
            } else {
                break;
            }
        }
        let literal = self.slice(start);

        if is_keyword(literal) {
            return self.token(TokenKind::BooleanOperator, start);
        }

        // 防止非法字段进入 SQL 文本
        if !self.fields.contains(literal) {
            return Token::error(format!("{literal:?} isn't a valid field"));
        }
        self.token(TokenKind::Field, start)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.'
}

/// `AND` / `OR` 是保留字，任何大小写都按布尔运算符处理
pub(crate) fn is_keyword(word: &str) -> bool {
    word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or")
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();
        let start = self.position;

        let Some(c) = self.bump() else {
            self.finished = true;
            return None; // 到达输入末尾
        };

        let token = match c {
            '(' => self.token(TokenKind::OpenGroup, start),
            ')' => self.token(TokenKind::CloseGroup, start),
            '"' => self.read_literal(start),
            '&' | '|' => self.read_boolean(c, start),
            '<' | '>' | '=' | '!' => self.read_comparator(start),
            _ => self.read_identifier(start),
        };

        if token.is_error() {
            tracing::debug!(error = %token.text, "lexing stopped on error");
            self.finished = true;
        }
        Some(token)
    }
}

impl FusedIterator for Lexer<'_> {}
