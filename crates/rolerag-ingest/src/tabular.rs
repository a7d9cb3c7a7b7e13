//! Flat-text rendering of tabular files.

use std::path::Path;

use rolerag_core::error::{Error, Result};

/// Render a CSV file as aligned plain text.
///
/// The first output line is always the header row, so downstream structured
/// lookups can identify column names; data rows follow with cells padded to
/// a common column width.
pub fn render_csv(path: &Path) -> Result<String> {
    // Strict field counts: a ragged row is a malformed file, reported to
    // the caller rather than silently rendered askew.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| Error::storage(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::storage(path, e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::storage(path, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            } else {
                widths.push(cell.len());
            }
        }
    }

    let mut out = String::new();
    render_row(&mut out, &headers, &widths);
    for row in &rows {
        render_row(&mut out, row, &widths);
    }
    Ok(out)
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        let width = widths.get(i).copied().unwrap_or(cell.len());
        for _ in cell.len()..width {
            out.push(' ');
        }
    }
    // Trailing pad spaces on the last cell are noise; drop them.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}
