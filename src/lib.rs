//! Fundwatch - intraday fund valuation monitor
//!
//! This library fetches the provider's intraday valuation estimate and the
//! stage-performance figures for a list of funds, keeps the funds whose
//! estimated change crosses a threshold, and renders them into an HTML
//! report that is mailed over SMTP.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod funds;
pub mod notify;
pub mod pipeline;
pub mod report;
