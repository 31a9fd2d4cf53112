//! Fetch → extract → filter over the whole registry.
//!
//! Funds are processed one after another. A fund that fails at any stage is
//! recorded as a [`FundFailure`] and the run moves on to the next one.

use tracing::{info, warn};

use crate::error::{FundFailure, Stage};
use crate::extract::FundRecord;
use crate::fetch::FundSource;
use crate::filter::{select_significant, Thresholds, ValuationSnapshot};
use crate::funds::Fund;

#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Qualifying funds, in registry order
    pub retained: Vec<ValuationSnapshot>,
    pub failures: Vec<FundFailure>,
    /// Funds whose percentage was checked against the thresholds
    pub evaluated: usize,
    pub below_threshold: usize,
}

/// Fetch and extract every fund. Failures are collected, not raised.
pub fn collect_records(
    funds: &[Fund],
    source: &dyn FundSource,
) -> (Vec<FundRecord>, Vec<FundFailure>) {
    let mut records = Vec::with_capacity(funds.len());
    let mut failures = Vec::new();

    for fund in funds {
        let payloads = match source.fetch_payloads(fund.code()) {
            Ok(payloads) => payloads,
            Err(err) => {
                warn!("Fetch failed for {} ({}): {:#}", fund.code(), fund.memo(), err);
                failures.push(FundFailure::new(fund.code(), fund.memo(), Stage::Fetch, &err));
                continue;
            }
        };

        match FundRecord::from_payloads(fund, &payloads.snapshot, &payloads.detail) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!("Snapshot for {} ({}) dropped: {:#}", fund.code(), fund.memo(), err);
                failures.push(FundFailure::new(fund.code(), fund.memo(), Stage::Snapshot, &err));
            }
        }
    }

    (records, failures)
}

pub fn run_pipeline(
    funds: &[Fund],
    source: &dyn FundSource,
    thresholds: &Thresholds,
) -> RunOutcome {
    info!("Checking {} fund(s) via {}", funds.len(), source.source_name());
    let (records, mut failures) = collect_records(funds, source);
    let evaluated = records.len();

    let filtered = select_significant(records, thresholds);
    failures.extend(filtered.failures);

    info!(
        "{} of {} fund(s) crossed the thresholds, {} failed",
        filtered.retained.len(),
        funds.len(),
        failures.len()
    );

    RunOutcome {
        retained: filtered.retained,
        failures,
        evaluated,
        below_threshold: filtered.below_threshold,
    }
}
