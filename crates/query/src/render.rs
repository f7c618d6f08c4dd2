//! Text rendering of schemas, table lists and result sets.

use crate::result::ResultSet;
use kvsql_core::schema::Table;

const SCHEMA_RULE: usize = 65;
const TABLE_LIST_RULE: usize = 24;
const MIN_COLUMN_WIDTH: usize = 18;

/// Renders the DESC block for a table.
pub fn render_schema(table: &Table) -> String {
    let rule = "-".repeat(SCHEMA_RULE);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("table_name [{}]\n", table.name()));
    out.push_str(&format!(
        "{:<20}{:<15}{:<15}{:<15}\n",
        "column_name", "type", "null", "key"
    ));
    for column in table.columns() {
        let null = if column.is_nullable() { "Y" } else { "N" };
        out.push_str(&format!(
            "{:<20}{:<15}{:<15}{:<15}\n",
            column.name(),
            column.data_type().to_string(),
            null,
            column.key_label()
        ));
    }
    out.push_str(&rule);
    out
}

/// Renders the SHOW TABLES block.
pub fn render_table_list(tables: &[String]) -> String {
    let rule = "-".repeat(TABLE_LIST_RULE);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for name in tables {
        out.push_str(name);
        out.push('\n');
    }
    out.push_str(&rule);
    out
}

/// Renders rows as a fixed-width table.
///
/// Each column is as wide as the widest of its header, its values and
/// `MIN_COLUMN_WIDTH`.
pub fn render_result_set(rows: &ResultSet) -> String {
    let widths: Vec<usize> = rows
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.records
                .iter()
                .filter_map(|record| record.get(i))
                .map(|v| v.display_width())
                .fold(MIN_COLUMN_WIDTH.max(name.chars().count()), usize::max)
        })
        .collect();

    let mut separator: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect();
    separator.push('+');

    let header: Vec<String> = rows
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, w)| format!("{:<w$}", name.to_uppercase(), w = *w))
        .collect();

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format!("| {} |\n", header.join(" | ")));
    out.push_str(&separator);
    out.push('\n');
    for record in &rows.records {
        let cells: Vec<String> = record
            .iter()
            .zip(&widths)
            .map(|(value, w)| format!("{:<w$}", value, w = *w))
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out.push_str(&separator);
    out
}
