use std::fmt::Write as _;

use itertools::Itertools;

use crate::{data::display_cell, rows::DecodedRow};

const COLUMN_GAP: &str = "  ";

/// Renders decoded rows as an aligned text table. Columns come from the first
/// row; absent values render as blank cells.
pub fn render_rows(rows: &[DecodedRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers = first.names().map(str::to_string).collect_vec();
    let cells = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|name| single_line(&display_cell(row.value(name))))
                .collect_vec()
        })
        .collect_vec();
    render_table(&headers, &cells)
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count().max(3)).collect_vec();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect_vec();
    let _ = writeln!(output, "{}", format_line(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths));
    }
    output
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

fn single_line(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
