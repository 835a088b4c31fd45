//! Rewrites generic `?` placeholders into a driver-specific marker syntax.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The generic positional marker emitted by the code generator.
pub const PLACEHOLDER: char = '?';

/// Numbered placeholder syntax understood by the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ... (PostgreSQL)
    #[default]
    Dollar,
    /// `:1`, `:2`, ... (Oracle)
    Colon,
}

impl PlaceholderStyle {
    pub fn prefix(self) -> char {
        match self {
            PlaceholderStyle::Dollar => '$',
            PlaceholderStyle::Colon => ':',
        }
    }
}

impl FromStr for PlaceholderStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dollar" | "$" => Ok(PlaceholderStyle::Dollar),
            "colon" | ":" => Ok(PlaceholderStyle::Colon),
            _ => Err(ConfigError::UnknownStyle(s.to_string())),
        }
    }
}

/// Replaces every `?` in `sql` with the next numbered marker, left to right, starting at 1.
///
/// `??` escapes a literal question mark: it is written out as a single `?` and does not
/// consume a number.
pub fn rewrite_placeholders(sql: &str, style: PlaceholderStyle) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut index = 0usize;

    scan(sql, |piece| match piece {
        Piece::Text(text) => out.push_str(text),
        Piece::Escaped => out.push(PLACEHOLDER),
        Piece::Placeholder => {
            index += 1;
            out.push(style.prefix());
            out.push_str(&index.to_string());
        }
    });
    out
}

/// Number of unescaped placeholders in `sql`.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    scan(sql, |piece| {
        if piece == Piece::Placeholder {
            count += 1;
        }
    });
    count
}

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Escaped,
    Placeholder,
}

fn scan<'a>(sql: &'a str, mut visit: impl FnMut(Piece<'a>)) {
    let mut rest = sql;
    while let Some(pos) = rest.find(PLACEHOLDER) {
        visit(Piece::Text(&rest[..pos]));
        let after = &rest[pos + 1..];
        if let Some(tail) = after.strip_prefix(PLACEHOLDER) {
            visit(Piece::Escaped);
            rest = tail;
        } else {
            visit(Piece::Placeholder);
            rest = after;
        }
    }
    visit(Piece::Text(rest));
}
