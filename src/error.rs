//! Error handling for fundwatch
//!
//! Defines the domain error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use std::fmt;

use thiserror::Error;

/// Core error types for a monitoring run
#[derive(Error, Debug)]
pub enum FundWatchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("numeric parse error: {0}")]
    NumericParse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("delivery error: {0}")]
    Delivery(String),
}

/// Result type alias for fundwatch operations
pub type Result<T> = anyhow::Result<T>;

/// Pipeline stage a single fund failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Snapshot,
    Percentage,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Snapshot => "snapshot",
            Stage::Percentage => "percentage",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fund dropped from the current run, with the stage and reason
#[derive(Debug, Clone)]
pub struct FundFailure {
    pub code: String,
    pub memo: String,
    pub stage: Stage,
    pub reason: String,
}

impl FundFailure {
    pub fn new(code: &str, memo: &str, stage: Stage, err: &anyhow::Error) -> Self {
        Self {
            code: code.to_string(),
            memo: memo.to_string(),
            stage,
            // {:#} keeps the whole context chain on one line
            reason: format!("{:#}", err),
        }
    }
}

impl fmt::Display for FundFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) failed at {}: {}", self.code, self.memo, self.stage, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = FundWatchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn test_fund_watch_error_variants() {
        let parse_err = FundWatchError::SnapshotParse("test".to_string());
        assert!(parse_err.to_string().starts_with("snapshot parse error"));

        let num_err = FundWatchError::NumericParse("test".to_string());
        assert!(num_err.to_string().starts_with("numeric parse error"));

        let cfg_err = FundWatchError::Config("test".to_string());
        assert!(cfg_err.to_string().starts_with("configuration error"));

        let mail_err = FundWatchError::Delivery("test".to_string());
        assert!(mail_err.to_string().starts_with("delivery error"));
    }

    #[test]
    fn test_fund_failure_reports_full_chain() {
        use anyhow::Context;
        let err = Err::<(), _>(anyhow::anyhow!("timed out"))
            .context("request failed for http://example/1.js")
            .unwrap_err();
        let failure = FundFailure::new("110022", "WT", Stage::Fetch, &err);
        assert_eq!(failure.stage, Stage::Fetch);
        assert_eq!(
            failure.to_string(),
            "110022 (WT) failed at fetch: request failed for http://example/1.js: timed out"
        );
    }
}
