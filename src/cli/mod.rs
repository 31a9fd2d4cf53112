use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fundwatch")]
#[command(
    version,
    about = "Fund valuation monitor that emails significant intraday moves"
)]
#[command(
    long_about = "Fetch the intraday valuation estimate of every configured fund, keep the ones whose estimated change crosses the configured thresholds, and mail them as an HTML table. SMTP credentials are read from EMAIL_NAME and EMAIL_PASSWORD."
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the pipeline and print the qualifying funds, never send mail
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also write the HTML report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
