mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use fundwatch::config::{Config, Credentials};
use fundwatch::fetch::HttpFundSource;
use fundwatch::notify::{self, Delivery, SmtpMailer};
use fundwatch::pipeline::{self, RunOutcome};
use fundwatch::report::{self, RenderedReport};

fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the run summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.config.as_deref())?;

    // Missing credentials fail the run before any request is made
    let credentials = if cli.dry_run {
        None
    } else {
        Some(Credentials::from_env()?)
    };

    let source = HttpFundSource::from_config(&config.sources)?;
    let outcome = pipeline::run_pipeline(&config.funds, &source, &config.thresholds);
    let report = report::render_report(&outcome.retained, Local::now().naive_local());

    if let Some(path) = cli.output.as_deref() {
        if !report.is_empty() {
            fs::write(path, &report.html)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
    }

    print_summary(config.funds.len(), &outcome);

    match credentials {
        None => print_dry_run(&outcome, &report),
        Some(credentials) => {
            let mailer = SmtpMailer::new(&config.mail, &credentials)?;
            let delivery = notify::notify(
                &report,
                &credentials.username,
                &config.mail.subject_prefix,
                &mailer,
            )
            .context("Failed to deliver fund report")?;
            match delivery {
                Delivery::Skipped => {
                    println!(
                        "\n{} No fund crossed the thresholds, no mail sent",
                        "ℹ".blue().bold()
                    );
                }
                Delivery::Sent { subject } => {
                    println!("\n{} Mail sent: {}", "✓".green().bold(), subject);
                }
            }
        }
    }

    Ok(())
}

fn print_summary(total: usize, outcome: &RunOutcome) {
    println!("\n{} Checked {} fund(s)", "✓".green().bold(), total);
    println!("  Evaluated: {}", outcome.evaluated);
    println!("  Qualifying: {}", outcome.retained.len().to_string().green());
    println!("  Below threshold: {}", outcome.below_threshold);
    if !outcome.failures.is_empty() {
        println!("  Skipped: {}", outcome.failures.len().to_string().red());
        for failure in &outcome.failures {
            println!("    - {}", failure);
        }
    }
}

fn print_dry_run(outcome: &RunOutcome, report: &RenderedReport) {
    if report.is_empty() {
        println!("\n{} No fund crossed the thresholds", "ℹ".blue().bold());
    } else {
        println!("\n{}", report::format_preview_table(&outcome.retained));
        if let Some(as_of) = report.as_of.as_deref() {
            println!("  As of: {}", as_of);
        }
    }
    println!("\n{} Dry run - no mail sent", "ℹ".blue().bold());
}
