//! HTML templates for the notification email.
//!
//! Every interpolated value goes through [`escape_html`]; provider names and
//! registry memos are free text.

use chrono::NaiveDateTime;

use crate::filter::ValuationSnapshot;

pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// (header label, width, alignment) per column, in row order
const COLUMNS: &[(&str, u32, &str)] = &[
    ("分类", 50, "center"),
    ("基金代码", 50, "center"),
    ("基金名称", 200, "left"),
    ("估算涨幅", 50, "center"),
    ("当前估算净值", 50, "center"),
    ("昨日单位净值", 50, "center"),
    ("估算时间", 100, "center"),
    ("近1周净值变化", 50, "center"),
    ("近1月净值变化", 50, "center"),
];

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Cell values of one report row, in column order, unescaped.
pub fn row_values(snapshot: &ValuationSnapshot) -> [String; 9] {
    [
        snapshot.memo.clone(),
        snapshot.code.clone(),
        snapshot.name.clone(),
        format!("{}%", snapshot.formatted_change()),
        snapshot.estimated_nav.clone(),
        snapshot.prior_nav.clone(),
        snapshot.estimated_at.clone(),
        snapshot.weekly_change.clone().unwrap_or_default(),
        snapshot.monthly_change.clone().unwrap_or_default(),
    ]
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut row = String::from("        <tr>\n");
    for (value, (_, width, align)) in cells.zip(COLUMNS) {
        row.push_str(&format!(
            "          <td width=\"{}\" align=\"{}\">{}</td>\n",
            width,
            align,
            escape_html(value)
        ));
    }
    row.push_str("        </tr>\n");
    row
}

pub fn render_table(snapshots: &[ValuationSnapshot]) -> String {
    let mut table = String::from(
        "      <table width=\"30%\" border=\"1\" cellspacing=\"0\" cellpadding=\"0\">\n",
    );
    table.push_str(&render_row(COLUMNS.iter().map(|(label, _, _)| *label)));
    for snapshot in snapshots {
        let values = row_values(snapshot);
        table.push_str(&render_row(values.iter().map(String::as_str)));
    }
    table.push_str("      </table>\n");
    table
}

pub fn render_document(table: &str, generated_at: NaiveDateTime) -> String {
    format!(
        r#"<html>
  <head>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
  </head>
  <body>
    <div id="container">
      <p>基金涨跌监控: {generated_at}</p>
      <div id="content">
{table}      </div>
    </div>
  </body>
</html>
"#,
        generated_at = escape_html(&generated_at.format(GENERATED_AT_FORMAT).to_string()),
        table = table,
    )
}
