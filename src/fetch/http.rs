use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use super::FundSource;
use crate::config::SourceConfig;
use crate::error::FundWatchError;

/// Blocking HTTP source for the valuation and detail endpoints.
/// Every request is bounded by the configured timeout; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpFundSource {
    http: Client,
    valuation_base_url: String,
    detail_base_url: String,
}

impl HttpFundSource {
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to build fund http client")?;

        Ok(Self {
            http,
            valuation_base_url: config.valuation_base_url.clone(),
            detail_base_url: config.detail_base_url.clone(),
        })
    }

    pub fn snapshot_url(&self, code: &str) -> String {
        build_url(&self.valuation_base_url, code, "js")
    }

    pub fn detail_url(&self, code: &str) -> String {
        build_url(&self.detail_base_url, code, "html")
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("request failed for {}", url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FundWatchError::Transport(format!("{} returned {}", url, status)).into());
        }

        resp.text()
            .with_context(|| format!("failed reading response for {}", url))
    }
}

impl FundSource for HttpFundSource {
    fn source_name(&self) -> &'static str {
        "eastmoney_http"
    }

    fn fetch_snapshot(&self, code: &str) -> Result<String> {
        self.fetch_text(&self.snapshot_url(code))
    }

    fn fetch_detail(&self, code: &str) -> Result<String> {
        self.fetch_text(&self.detail_url(code))
    }
}

fn build_url(base: &str, code: &str, extension: &str) -> String {
    format!("{}/{}.{}", base.trim_end_matches('/'), code, extension)
}
