// Notification delivery for rendered reports

pub mod smtp;

pub use smtp::SmtpMailer;

use anyhow::Result;
use tracing::info;

use crate::report::RenderedReport;

/// A single-part HTML email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

pub trait Mailer {
    fn send(&self, email: &OutgoingEmail) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing qualified, no mail was sent
    Skipped,
    Sent { subject: String },
}

pub fn subject_line(prefix: &str, as_of: Option<&str>) -> String {
    format!("{} [{}]", prefix, as_of.unwrap_or_default())
}

/// Mail a non-empty report to `address` (sender and recipient are the same
/// mailbox). An empty report is a successful no-op.
pub fn notify(
    report: &RenderedReport,
    address: &str,
    subject_prefix: &str,
    mailer: &dyn Mailer,
) -> Result<Delivery> {
    if report.is_empty() {
        info!("No fund crossed the thresholds, not sending mail");
        return Ok(Delivery::Skipped);
    }

    let email = OutgoingEmail {
        from: address.to_string(),
        to: address.to_string(),
        subject: subject_line(subject_prefix, report.as_of.as_deref()),
        html_body: report.html.clone(),
    };
    mailer.send(&email)?;
    info!("Sent report with {} fund(s) to {}", report.rows, address);
    Ok(Delivery::Sent {
        subject: email.subject,
    })
}
