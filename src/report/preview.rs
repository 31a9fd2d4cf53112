use tabled::{settings::Style, Table, Tabled};

use crate::filter::ValuationSnapshot;

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "Memo")]
    memo: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Est. NAV")]
    estimated_nav: String,
    #[tabled(rename = "Prior NAV")]
    prior_nav: String,
    #[tabled(rename = "Estimated at")]
    estimated_at: String,
    #[tabled(rename = "1W")]
    weekly: String,
    #[tabled(rename = "1M")]
    monthly: String,
}

/// Terminal table of the qualifying funds, for dry runs
pub fn format_preview_table(snapshots: &[ValuationSnapshot]) -> String {
    let rows: Vec<PreviewRow> = snapshots
        .iter()
        .map(|s| PreviewRow {
            memo: s.memo.clone(),
            code: s.code.clone(),
            name: s.name.clone(),
            change: format!("{}%", s.formatted_change()),
            estimated_nav: s.estimated_nav.clone(),
            prior_nav: s.prior_nav.clone(),
            estimated_at: s.estimated_at.clone(),
            weekly: s.weekly_change.clone().unwrap_or_else(|| "-".to_string()),
            monthly: s.monthly_change.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
