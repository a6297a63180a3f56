//! 校验和报告
//!
//! 对端节点周期性发送 `服务名 -> 校验和` 的批量报告，支持两种格式：
//!
//! - JSON：`{"namespaceId": "public", "entries": {"svc": "checksum"}}`
//!   （兼容旧字段名 `domName2Checksum`）
//! - 文本：`name1@@checksum1@@@name2@@checksum2`，归入默认命名空间

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{NamingError, Result};

/// 文本格式中条目之间的分隔符
pub const ENTRY_SEPARATOR: &str = "@@@";

/// 文本格式中服务名与校验和之间的分隔符
pub const CHECKSUM_SEPARATOR: &str = "@@";

/// 单个对端发来的校验和报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksumReport {
    pub namespace_id: String,
    #[serde(
        alias = "domName2Checksum",
        default,
        deserialize_with = "deserialize_entries"
    )]
    pub entries: BTreeMap<String, String>,
}

impl ChecksumReport {
    pub fn new(namespace_id: impl Into<String>) -> Self {
        Self {
            namespace_id: namespace_id.into(),
            entries: BTreeMap::new(),
        }
    }

    /// 添加条目
    pub fn with_entry(mut self, service_name: impl Into<String>, checksum: impl Into<String>) -> Self {
        self.entries.insert(service_name.into(), checksum.into());
        self
    }

    /// 解析报告载荷
    ///
    /// 以 JSON 开头的载荷按 JSON 解析，其余按文本格式解析到 `default_namespace`。
    /// 无法解析时返回 `MalformedPayload`
    pub fn parse(payload: &str, default_namespace: &str) -> Result<Self> {
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return Err(NamingError::malformed_payload("empty checksum report"));
        }

        if looks_like_json(trimmed) {
            let report: Option<ChecksumReport> = serde_json::from_str(trimmed)
                .map_err(|e| NamingError::malformed_payload(e.to_string()))?;
            return report.ok_or_else(|| NamingError::malformed_payload("null checksum report"));
        }

        Self::parse_legacy(trimmed, default_namespace)
    }

    /// 解析文本格式
    ///
    /// 缺少校验和分隔符的片段记为空校验和，由对账阶段跳过；
    /// 没有任何 `名称@@校验和` 片段的载荷视为格式错误
    pub fn parse_legacy(payload: &str, namespace_id: &str) -> Result<Self> {
        let has_entry = payload
            .split(ENTRY_SEPARATOR)
            .filter_map(|segment| segment.split_once(CHECKSUM_SEPARATOR))
            .any(|(name, _)| !name.trim().is_empty());
        if !has_entry {
            return Err(NamingError::malformed_payload(
                "checksum report contains no name@@checksum entry",
            ));
        }

        let entries = payload
            .split(ENTRY_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once(CHECKSUM_SEPARATOR) {
                Some((name, checksum)) => (name.to_string(), checksum.to_string()),
                None => (segment.to_string(), String::new()),
            })
            .collect();

        Ok(Self {
            namespace_id: namespace_id.to_string(),
            entries,
        })
    }

    /// 编码为文本格式（不含命名空间）
    pub fn to_legacy_string(&self) -> String {
        self.entries
            .iter()
            .map(|(name, checksum)| format!("{}{}{}", name, CHECKSUM_SEPARATOR, checksum))
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn looks_like_json(payload: &str) -> bool {
    payload.starts_with('{') || payload.starts_with('[') || payload == "null"
}

/// 空值校验和按空字符串处理，留给对账阶段逐条跳过
fn deserialize_entries<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, checksum)| (name, checksum.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_segment_without_checksum_keeps_blank_entry() {
        let report = ChecksumReport::parse_legacy("a@@1@@@b@@@c@@3", "public").unwrap();
        assert_eq!(report.entries.get("a").map(String::as_str), Some("1"));
        assert_eq!(report.entries.get("b").map(String::as_str), Some(""));
        assert_eq!(report.entries.get("c").map(String::as_str), Some("3"));
    }

    #[test]
    fn json_accepts_legacy_field_name_and_null_checksums() {
        let report = ChecksumReport::parse(
            r#"{"namespaceId":"ns","domName2Checksum":{"a":"1","b":null}}"#,
            "public",
        )
        .unwrap();
        assert_eq!(report.namespace_id, "ns");
        assert_eq!(report.entries.get("b").map(String::as_str), Some(""));
    }

    #[test]
    fn null_and_broken_json_are_malformed() {
        assert!(ChecksumReport::parse("null", "public").is_err());
        assert!(ChecksumReport::parse("{\"namespaceId\":", "public").is_err());
        assert!(ChecksumReport::parse("{\"entries\":{}}", "public").is_err());
        assert!(ChecksumReport::parse("   ", "public").is_err());
    }

    #[test]
    fn text_without_any_entry_is_malformed() {
        for payload in ["garbage", "42", "true", "\"str\"", "<xml/>", "@@abc", "a@@@b"] {
            assert!(ChecksumReport::parse(payload, "public").is_err(), "{}", payload);
        }
    }

    #[test]
    fn legacy_string_parses_back() {
        let report = ChecksumReport::new("public")
            .with_entry("svcA", "c1")
            .with_entry("svcB", "c2");
        let text = report.to_legacy_string();

        assert_eq!(text, "svcA@@c1@@@svcB@@c2");
        assert_eq!(ChecksumReport::parse(&text, "public").unwrap(), report);
    }
}
