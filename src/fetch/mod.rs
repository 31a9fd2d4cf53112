// Fetching raw provider payloads for a fund

pub mod http;

pub use http::HttpFundSource;

use anyhow::Result;

/// Raw payloads for one fund, as returned by the provider.
#[derive(Debug, Clone)]
pub struct RawPayloads {
    /// JSONP-wrapped valuation snapshot
    pub snapshot: String,
    /// Fund detail page HTML
    pub detail: String,
}

/// Source of the two per-fund payloads.
pub trait FundSource {
    fn source_name(&self) -> &'static str;

    fn fetch_snapshot(&self, code: &str) -> Result<String>;

    fn fetch_detail(&self, code: &str) -> Result<String>;

    /// Both payloads, snapshot first. Either failure fails the fund.
    fn fetch_payloads(&self, code: &str) -> Result<RawPayloads> {
        let snapshot = self.fetch_snapshot(code)?;
        let detail = self.fetch_detail(code)?;
        Ok(RawPayloads { snapshot, detail })
    }
}
