use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::FundWatchError;

/// Unwrap a `callback({...});` response and parse the inner object into a
/// flat field map.
///
/// Strings are kept verbatim, numbers and booleans keep their textual form,
/// `null` becomes an empty string. Nested arrays or objects are rejected.
pub fn parse_jsonp(body: &str) -> Result<BTreeMap<String, String>> {
    let inner = unwrap_callback(body)?;
    let value: Value =
        serde_json::from_str(inner).context("failed to parse snapshot payload as JSON")?;
    let object = value.as_object().ok_or_else(|| {
        FundWatchError::SnapshotParse("snapshot payload is not a JSON object".to_string())
    })?;

    let mut fields = BTreeMap::new();
    for (key, value) in object {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Array(_) | Value::Object(_) => {
                return Err(FundWatchError::SnapshotParse(format!(
                    "snapshot field '{}' is not a scalar",
                    key
                ))
                .into());
            }
        };
        fields.insert(key.clone(), text);
    }
    Ok(fields)
}

fn unwrap_callback(body: &str) -> Result<&str> {
    let re = Regex::new(r"(?s)[A-Za-z_$][A-Za-z0-9_$]*\((.*)\);").context("invalid regex")?;
    let caps = re.captures(body).ok_or_else(|| {
        FundWatchError::SnapshotParse("response is not wrapped in a JSONP callback".to_string())
    })?;
    let inner = caps
        .get(1)
        .context("missing JSONP payload capture")?
        .as_str()
        .trim();
    if inner.is_empty() {
        return Err(
            FundWatchError::SnapshotParse("JSONP callback has an empty payload".to_string()).into(),
        );
    }
    Ok(inner)
}
