// Report rendering - HTML email body and terminal preview

pub mod html;
pub mod preview;

pub use preview::format_preview_table;

use chrono::NaiveDateTime;

use crate::filter::{latest_estimate, ValuationSnapshot};

/// Output of one run's rendering step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    /// Standalone HTML document, empty when nothing qualified
    pub html: String,
    pub rows: usize,
    /// Latest estimate time among the reported funds, used in the subject
    pub as_of: Option<String>,
}

impl RenderedReport {
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Render the qualifying snapshots in the order given.
pub fn render_report(
    snapshots: &[ValuationSnapshot],
    generated_at: NaiveDateTime,
) -> RenderedReport {
    if snapshots.is_empty() {
        return RenderedReport {
            html: String::new(),
            rows: 0,
            as_of: None,
        };
    }

    let table = html::render_table(snapshots);
    RenderedReport {
        html: html::render_document(&table, generated_at),
        rows: snapshots.len(),
        as_of: latest_estimate(snapshots),
    }
}
