//! Weekly and monthly change scraping from the fund detail page.
//!
//! This extraction is positional: the provider's markup carries no label we
//! can anchor "weekly" or "monthly" to, so the values are taken by their
//! ordinal position inside the stage-performance row. A layout change on the
//! provider side makes both values silently disappear; fix it here.

use scraper::{Html, Selector};

/// Second row of the first table inside the stage-performance section.
const STAGE_ROW_SELECTOR: &str =
    "#increaseAmount_stage > table:nth-child(1) > tbody:nth-child(1) > tr:nth-child(2)";
/// Value containers within that row, in document order.
const STAGE_CELL_SELECTOR: &str = "td > div";

const WEEKLY_CELL_INDEX: usize = 1;
const MONTHLY_CELL_INDEX: usize = 2;

/// Period changes scraped from the detail page. `None` when the page did
/// not have the expected structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodChanges {
    pub weekly: Option<String>,
    pub monthly: Option<String>,
}

pub fn parse_period_changes(html: &str) -> PeriodChanges {
    let cells = stage_row_cells(html).unwrap_or_default();
    let pick = |idx: usize| cells.get(idx).filter(|s| !s.is_empty()).cloned();
    PeriodChanges {
        weekly: pick(WEEKLY_CELL_INDEX),
        monthly: pick(MONTHLY_CELL_INDEX),
    }
}

fn stage_row_cells(html: &str) -> Option<Vec<String>> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse(STAGE_ROW_SELECTOR).ok()?;
    let cell_sel = Selector::parse(STAGE_CELL_SELECTOR).ok()?;

    let row = document.select(&row_sel).next()?;
    let cells = row
        .select(&cell_sel)
        .map(|node| node.text().collect::<Vec<_>>().join("").trim().to_string())
        .collect();
    Some(cells)
}
