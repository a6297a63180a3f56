//! 服务选择器
//!
//! 选择器文档是一个带 `type` 字段的 JSON：
//!
//! ```json
//! {"type": "none"}
//! {"type": "label", "expression": "SERVICE.metadata.env = 'prod'"}
//! ```
//!
//! `label` 目前只支持一个等值子句 `FACTOR.metadata.KEY = 'VALUE'`，
//! 其中 `FACTOR` 为 `INSTANCE` 或 `SERVICE`。

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{NamingError, Result};

/// 选择器
///
/// 解析时即确定变体，未知的 `type` 在构造阶段就被拒绝
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", try_from = "SelectorDocument")]
pub enum Selector {
    /// 不做任何过滤
    #[default]
    None,
    /// 标签选择器
    Label(LabelSelector),
}

impl Selector {
    /// 解析选择器文档
    ///
    /// 空白文档视为 `Selector::None`
    pub fn parse(document: &str) -> Result<Self> {
        if document.trim().is_empty() {
            return Ok(Selector::None);
        }
        let document: SelectorDocument = serde_json::from_str(document)?;
        Selector::try_from(document)
    }

    /// 需要执行的过滤子句；`None` 表示输入原样通过
    pub fn clause(&self) -> Option<&LabelClause> {
        match self {
            Selector::None => None,
            Selector::Label(label) => label.clause(),
        }
    }

    /// 选择器类型名
    pub fn type_name(&self) -> &'static str {
        match self {
            Selector::None => "none",
            Selector::Label(_) => "label",
        }
    }
}

/// 选择器的原始 JSON 文档
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorDocument {
    #[serde(rename = "type")]
    pub selector_type: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
}

impl TryFrom<SelectorDocument> for Selector {
    type Error = NamingError;

    fn try_from(document: SelectorDocument) -> Result<Self> {
        match document.selector_type.as_deref() {
            Some("none") => Ok(Selector::None),
            Some("label") => Ok(Selector::Label(LabelSelector::new(
                document.expression.unwrap_or_default(),
            )?)),
            Some(other) => Err(NamingError::unknown_selector_type(other)),
            None => Err(NamingError::invalid_selector("selector type is missing")),
        }
    }
}

/// 标签选择器
///
/// `labels` 由 `expression` 推导而来，仅用于展示，过滤时使用的是 `clause`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelSelector {
    expression: String,
    labels: BTreeSet<String>,
    #[serde(skip)]
    clause: Option<LabelClause>,
}

impl LabelSelector {
    /// 从原始表达式构造
    ///
    /// 空白表达式合法，但不做任何过滤；非空表达式必须包含 `=`
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let clause = if expression.trim().is_empty() {
            None
        } else {
            Some(LabelClause::parse(&expression)?)
        };
        Ok(Self {
            labels: Self::parse_expression(&expression),
            expression,
            clause,
        })
    }

    /// 将表达式去除空白后按 `.` 和 `=` 拆分为标签集合
    pub fn parse_expression(expression: &str) -> BTreeSet<String> {
        delete_whitespace(expression)
            .split(['.', '='])
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    pub fn clause(&self) -> Option<&LabelClause> {
        self.clause.as_ref()
    }
}

/// 过滤作用对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorFactor {
    /// 按实例元数据过滤
    Instance,
    /// 按服务元数据过滤
    Service,
    /// 不支持的对象，过滤时忽略
    Other(String),
}

impl SelectorFactor {
    fn from_token(token: &str) -> Self {
        match token {
            "INSTANCE" => SelectorFactor::Instance,
            "SERVICE" => SelectorFactor::Service,
            other => SelectorFactor::Other(other.to_string()),
        }
    }
}

/// 等值子句 `FACTOR.metadata.KEY = 'VALUE'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelClause {
    pub factor: SelectorFactor,
    pub key: String,
    pub value: String,
}

impl LabelClause {
    /// 解析等值子句
    ///
    /// 左侧第一段为作用对象，最后一段为键，中间路径忽略；
    /// 右侧去掉首尾单引号作为值
    pub fn parse(expression: &str) -> Result<Self> {
        let stripped = delete_whitespace(expression);
        let (lhs, rhs) = stripped
            .split_once('=')
            .ok_or_else(|| NamingError::malformed_expression(expression))?;

        let factor = SelectorFactor::from_token(lhs.split('.').next().unwrap_or_default());
        let key = lhs.rsplit('.').next().unwrap_or_default().to_string();

        Ok(Self {
            factor,
            key,
            value: rhs.trim_matches('\'').to_string(),
        })
    }
}

fn delete_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_takes_last_path_segment_as_key() {
        let clause = LabelClause::parse("SERVICE.metadata.a.b.env = 'prod'").unwrap();
        assert_eq!(clause.factor, SelectorFactor::Service);
        assert_eq!(clause.key, "env");
        assert_eq!(clause.value, "prod");
    }

    #[test]
    fn clause_keeps_unknown_factor() {
        let clause = LabelClause::parse("CONSUMER.label.A=B").unwrap();
        assert_eq!(clause.factor, SelectorFactor::Other("CONSUMER".to_string()));
        assert_eq!(clause.key, "A");
    }

    #[test]
    fn clause_without_equals_is_malformed() {
        assert!(LabelClause::parse("SERVICE.metadata.env").is_err());
    }

    #[test]
    fn labels_are_split_on_dots_and_equals() {
        let labels = LabelSelector::parse_expression(" INSTANCE.metadata.zone = 'a' ");
        let expected: BTreeSet<String> = ["INSTANCE", "metadata", "zone", "'a'"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(labels, expected);
    }
}
