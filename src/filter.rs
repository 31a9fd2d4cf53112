//! Significant-change filter
//!
//! Turns extracted fund records into typed valuation snapshots and keeps
//! only the funds whose estimated daily change crosses the configured
//! thresholds. Percentages are exact decimals, so the ±0.5 boundaries are
//! compared without float rounding.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{FundFailure, FundWatchError, Stage};
use crate::extract::{
    FundRecord, FIELD_CHANGE_PCT, FIELD_CODE, FIELD_ESTIMATED_AT, FIELD_ESTIMATED_NAV, FIELD_NAME,
    FIELD_PRIOR_NAV,
};

const ESTIMATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Inclusive change boundaries: a fund qualifies when its change is at or
/// above `rise`, or at or below `fall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub rise: Decimal,
    pub fall: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rise: Decimal::new(5, 1),
            fall: Decimal::new(-5, 1),
        }
    }
}

impl Thresholds {
    pub fn is_significant(&self, change_pct: Decimal) -> bool {
        change_pct >= self.rise || change_pct <= self.fall
    }
}

/// Typed per-fund valuation for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub code: String,
    pub name: String,
    pub memo: String,
    pub change_pct: Decimal,
    pub estimated_nav: String,
    pub prior_nav: String,
    /// Estimate timestamp as sent by the provider
    pub estimated_at: String,
    pub estimated_at_parsed: Option<NaiveDateTime>,
    pub weekly_change: Option<String>,
    pub monthly_change: Option<String>,
    /// Provider fields not mapped above
    pub extra: BTreeMap<String, String>,
}

impl ValuationSnapshot {
    /// Fails when the percentage change does not parse as a decimal.
    pub fn from_record(record: FundRecord) -> Result<Self> {
        let FundRecord {
            mut fields,
            changes,
            memo,
        } = record;
        let mut take = |key: &str| fields.remove(key).unwrap_or_default();

        let code = take(FIELD_CODE);
        let raw_pct = take(FIELD_CHANGE_PCT);
        let change_pct = parse_change_pct(&raw_pct)
            .with_context(|| format!("invalid {} value for {}", FIELD_CHANGE_PCT, code))?;
        let name = take(FIELD_NAME);
        let estimated_nav = take(FIELD_ESTIMATED_NAV);
        let prior_nav = take(FIELD_PRIOR_NAV);
        let estimated_at = take(FIELD_ESTIMATED_AT);
        let estimated_at_parsed = parse_estimate_time(&estimated_at);

        Ok(Self {
            code,
            name,
            memo,
            change_pct,
            estimated_nav,
            prior_nav,
            estimated_at,
            estimated_at_parsed,
            weekly_change: changes.weekly,
            monthly_change: changes.monthly,
            extra: fields,
        })
    }

    /// Signed percentage without the `%` suffix, e.g. `+0.73` or `-1.2`
    pub fn formatted_change(&self) -> String {
        format_change(self.change_pct)
    }
}

/// Parse a provider percentage such as `"1.05"`, `"-0.3"` or `"+2"`.
///
/// Digits past 28 decimal places are rounded by `Decimal::from_str`, so
/// `"0.49999999999999999999999999999"` parses as `0.5` and qualifies.
pub fn parse_change_pct(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| FundWatchError::NumericParse(format!("'{}' is not a decimal", raw)).into())
}

/// Strip trailing zeros and add an explicit `+` to positive values.
pub fn format_change(change_pct: Decimal) -> String {
    let normalized = change_pct.normalize();
    if normalized > Decimal::ZERO {
        format!("+{}", normalized)
    } else {
        normalized.to_string()
    }
}

fn parse_estimate_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ESTIMATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Result of filtering one run's records
#[derive(Debug, Default)]
pub struct FilterOutcome {
    /// Qualifying funds, in input order
    pub retained: Vec<ValuationSnapshot>,
    pub failures: Vec<FundFailure>,
    pub below_threshold: usize,
}

pub fn select_significant(records: Vec<FundRecord>, thresholds: &Thresholds) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for record in records {
        let code = record.code().to_string();
        let memo = record.memo.clone();
        let snapshot = match ValuationSnapshot::from_record(record) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("Skipping fund {}: {:#}", code, err);
                outcome
                    .failures
                    .push(FundFailure::new(&code, &memo, Stage::Percentage, &err));
                continue;
            }
        };

        if thresholds.is_significant(snapshot.change_pct) {
            debug!("{} moved {}%, keeping", snapshot.code, snapshot.formatted_change());
            outcome.retained.push(snapshot);
        } else {
            debug!("{} moved {}%, below threshold", snapshot.code, snapshot.formatted_change());
            outcome.below_threshold += 1;
        }
    }
    outcome
}

/// Raw timestamp of the snapshot with the latest parsed estimate time.
/// Snapshots with an unparseable timestamp only win when nothing parses.
pub fn latest_estimate(snapshots: &[ValuationSnapshot]) -> Option<String> {
    snapshots
        .iter()
        .filter(|s| !s.estimated_at.trim().is_empty())
        .max_by_key(|s| s.estimated_at_parsed)
        .map(|s| s.estimated_at.clone())
}
