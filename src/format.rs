//! Markdown rendering of query results
//!
//! Output is bounded on purpose: it is shown in a terminal and embedded
//! into LLM prompts, so rows, columns and cell widths all have hard caps.

use crate::database::QueryRows;
use serde_json::Value as JsonValue;

/// Maximum data rows rendered before collapsing into a summary row.
pub const MAX_ROWS: usize = 10;
/// Maximum columns rendered; extra columns are dropped silently.
pub const MAX_COLUMNS: usize = 10;
/// Maximum rendered width of a string cell.
pub const MAX_CELL_WIDTH: usize = 50;

/// Fixed sentence for an empty result set.
pub const NO_RESULTS: &str = "Nenhum resultado encontrado.";

/// Render a materialized result set as a markdown table.
pub fn format_rows(rows: &QueryRows) -> String {
    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let columns: Vec<&String> = rows.columns.iter().take(MAX_COLUMNS).collect();

    let header = format!(
        "| {} |",
        columns
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    let separator = format!("| {} |", vec!["---"; columns.len()].join(" | "));

    let mut lines = vec![header, separator];
    for (i, row) in rows.rows.iter().enumerate() {
        if i >= MAX_ROWS {
            lines.push(format!(
                "| ... | ... | ... | (Mostrando {} de {} linhas) |",
                MAX_ROWS,
                rows.len()
            ));
            break;
        }

        let cells: Vec<String> = (0..columns.len())
            .map(|idx| format_cell(row.get(idx).unwrap_or(&JsonValue::Null)))
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

/// Render one cell. Nulls become the literal `NULL`, nested values their
/// JSON serialization, long strings are truncated with a trailing ellipsis.
fn format_cell(value: &JsonValue) -> String {
    let text = match value {
        JsonValue::Null => return "NULL".to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    };

    if text.len() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{cut}...")
    } else {
        text
    }
}
