//! Fund registry
//!
//! The list of funds to monitor. A built-in default list ships with the
//! binary; the config file can replace it with its own `[[funds]]` entries.

use serde::Deserialize;

/// A monitored fund: provider code, display name and a free-text memo used
/// for grouping in the report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Fund {
    code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    memo: String,
}

impl Fund {
    pub fn new(code: impl Into<String>, name: impl Into<String>, memo: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            memo: memo.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }
}

const DEFAULT_FUNDS: &[(&str, &str, &str)] = &[
    ("163417", "yy", "WT"),
    ("005827", "yy", "WT"),
    ("000751", "yy", "WT"),
    ("519772", "yy", "WT"),
    ("000083", "yy", "WT"),
    ("001171", "yy", "WT"),
    ("161028", "yy", "WT"),
    ("000751", "yy", "成长投资"),
    ("161005", "yy", "成长投资"),
    ("260108", "yy", "成长投资"),
    ("163406", "yy", "成长投资"),
    ("519704", "yy", "成长投资"),
    ("001875", "yy", "成长投资"),
    ("040035", "yy", "成长投资"),
    ("163415", "yy", "成长投资"),
    ("202023", "yy", "成长投资"),
    ("007119", "yy", "成长投资"),
    ("005827", "yy", "价值投资"),
    ("110022", "yy", "价值投资"),
    ("180012", "yy", "价值投资"),
    ("000083", "yy", "价值投资"),
    ("162605", "yy", "价值投资"),
    ("519066", "yy", "价值投资"),
    ("213001", "yy", "价值投资"),
    ("110003", "yy", "价值投资"),
    ("519697", "yy", "价值投资"),
    ("270002", "yy", "价值投资"),
    ("202101", "yy", "稳健投资"),
    ("110027", "yy", "稳健投资"),
    ("485111", "yy", "稳健投资"),
    ("003095", "yy", "成长投资***"),
    ("001410", "yy", "成长投资***"),
];

/// Built-in registry used when the config file has no `[[funds]]` entries.
///
/// The same code may appear under several memos; each entry is fetched and
/// reported on its own.
pub fn default_registry() -> Vec<Fund> {
    DEFAULT_FUNDS
        .iter()
        .map(|(code, name, memo)| Fund::new(*code, *name, *memo))
        .collect()
}
