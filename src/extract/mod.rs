// Extraction of structured fund data from the raw provider payloads

pub mod detail;
pub mod jsonp;

pub use detail::{parse_period_changes, PeriodChanges};
pub use jsonp::parse_jsonp;

use anyhow::Result;
use std::collections::BTreeMap;

use crate::funds::Fund;

pub const FIELD_CODE: &str = "fundcode";
pub const FIELD_NAME: &str = "name";
pub const FIELD_CHANGE_PCT: &str = "gszzl";
pub const FIELD_ESTIMATED_NAV: &str = "gsz";
pub const FIELD_PRIOR_NAV: &str = "dwjz";
pub const FIELD_ESTIMATED_AT: &str = "gztime";

/// Everything extracted for one fund in one run: the snapshot fields, the
/// scraped period changes and the registry memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundRecord {
    pub fields: BTreeMap<String, String>,
    pub changes: PeriodChanges,
    pub memo: String,
}

impl FundRecord {
    /// Build a record from both payloads. Fails only when the snapshot does
    /// not parse; an unrecognised detail page just leaves the changes empty.
    pub fn from_payloads(fund: &Fund, snapshot_body: &str, detail_html: &str) -> Result<Self> {
        let mut fields = parse_jsonp(snapshot_body)?;
        fill_if_blank(&mut fields, FIELD_CODE, fund.code());
        fill_if_blank(&mut fields, FIELD_NAME, fund.name());

        let changes = parse_period_changes(detail_html);
        if changes == PeriodChanges::default() {
            tracing::warn!(
                "No weekly/monthly changes found on detail page for {}",
                fund.code()
            );
        }

        Ok(Self {
            fields,
            changes,
            memo: fund.memo().to_string(),
        })
    }

    pub fn field(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn code(&self) -> &str {
        self.field(FIELD_CODE)
    }
}

fn fill_if_blank(fields: &mut BTreeMap<String, String>, key: &str, fallback: &str) {
    let blank = fields.get(key).map_or(true, |v| v.trim().is_empty());
    if blank && !fallback.is_empty() {
        fields.insert(key.to_string(), fallback.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_HTML: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/eastmoney_110022.html"
    ));

    #[test]
    fn merges_snapshot_changes_and_memo() {
        let fund = Fund::new("110022", "yy", "WT");
        let body = r#"jsonpgz({"fundcode":"110022","name":"X","gszzl":"1.05","gsz":"2.000","dwjz":"1.980","gztime":"2024-01-01 15:00"});"#;
        let record = FundRecord::from_payloads(&fund, body, DETAIL_HTML).unwrap();
        assert_eq!(record.code(), "110022");
        assert_eq!(record.field(FIELD_NAME), "X");
        assert_eq!(record.field(FIELD_CHANGE_PCT), "1.05");
        assert_eq!(record.changes.weekly.as_deref(), Some("+0.30%"));
        assert_eq!(record.changes.monthly.as_deref(), Some("+2.1%"));
        assert_eq!(record.memo, "WT");
    }

    #[test]
    fn missing_identity_falls_back_to_registry() {
        let fund = Fund::new("161005", "Registry Name", "成长投资");
        let record =
            FundRecord::from_payloads(&fund, r#"jsonpgz({"gszzl":"0.9","name":""});"#, "").unwrap();
        assert_eq!(record.code(), "161005");
        assert_eq!(record.field(FIELD_NAME), "Registry Name");
    }

    #[test]
    fn broken_detail_page_keeps_record() {
        let fund = Fund::new("110022", "yy", "WT");
        let record =
            FundRecord::from_payloads(&fund, r#"jsonpgz({"gszzl":"0.9"});"#, "<html></html>")
                .unwrap();
        assert_eq!(record.changes, PeriodChanges::default());
        assert_eq!(record.field(FIELD_ESTIMATED_NAV), "");
    }

    #[test]
    fn broken_snapshot_drops_record() {
        let fund = Fund::new("110022", "yy", "WT");
        assert!(FundRecord::from_payloads(&fund, "<html>503</html>", DETAIL_HTML).is_err());
    }
}
