//! 配置模块，负责字段白名单以及从JSON配置文件加载过滤器配置

use crate::error::ConfigError;
use crate::lexer::is_keyword;
use crate::placeholder::PlaceholderStyle;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 允许出现在过滤表达式中的字段名集合，只做成员判断
///
/// 保留字 `and` / `or`（不区分大小写）即使出现在白名单中也永远匹配不到字段，
/// 词法分析器总是把它们当作布尔运算符，见 [`FieldAllowList::reserved`]。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldAllowList {
    fields: HashSet<String>,
}

impl FieldAllowList {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 白名单中与保留字冲突、因而无法使用的字段名
    pub fn reserved(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(String::as_str)
            .filter(|field| is_keyword(field))
    }

    fn log_reserved(&self) {
        for field in self.reserved() {
            tracing::debug!(field, "allow-listed field is a reserved word and can never match");
        }
    }
}

impl<S: Into<String>> FromIterator<S> for FieldAllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let list = Self {
            fields: iter.into_iter().map(Into::into).collect(),
        };
        list.log_reserved();
        list
    }
}

/// 过滤器配置结构
///
/// ```json
/// {
///   "allowed_fields": ["Age", "Status", "Profile.City"],
///   "placeholder_style": "dollar"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub allowed_fields: FieldAllowList,
    /// 缺省为 `dollar`
    #[serde(default)]
    pub placeholder_style: PlaceholderStyle,
}

impl FilterConfig {
    pub fn new(allowed_fields: FieldAllowList, placeholder_style: PlaceholderStyle) -> Self {
        Self {
            allowed_fields,
            placeholder_style,
        }
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.display().to_string(),
            source,
        })?;

        let config = Self::from_json_str(&content)?;
        tracing::debug!(
            path = %path_ref.display(),
            fields = config.allowed_fields.len(),
            "loaded filter config"
        );
        Ok(config)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.allowed_fields.log_reserved();
        Ok(config)
    }
}
