//! Fixed-width ASCII rendering of query results

use crate::constants::{BETWEEN_ROWS_SEPARATOR, TABLE_COL_SEPARATOR, TABLE_ROW_SEPARATOR};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A fully fetched result set, every cell already converted to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. NULL cells render as empty; a short row is padded.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        let mut cells: Vec<String> = row.into_iter().map(Option::unwrap_or_default).collect();
        cells.resize(self.columns.len(), String::new());
        self.rows.push(cells);
    }

    /// Width of each column: longest header or cell, in chars.
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let total: usize = 1 + widths.iter().map(|w| w + 2).sum::<usize>();

        let border: String = std::iter::repeat(TABLE_ROW_SEPARATOR).take(total).collect();
        let between = between_rows_line(&widths);

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        out.push_str(&cells_line(&self.columns, &widths));
        out.push('\n');
        out.push_str(&between);
        out.push('\n');

        for row in &self.rows {
            out.push_str(&cells_line(row, &widths));
            out.push('\n');
            out.push_str(&between);
            out.push('\n');
        }

        out.push_str(&border);
        out.push('\n');
        out
    }

    /// Render into `path`, replacing any previous contents.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, self.render())
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        log::info!(
            "Wrote {} rows to {}",
            self.rows.len(),
            path.display()
        );
        Ok(())
    }
}

fn cells_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(TABLE_COL_SEPARATOR);
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!("{:<width$} {}", cell, TABLE_COL_SEPARATOR, width = *width));
    }
    line
}

fn between_rows_line(widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(TABLE_COL_SEPARATOR);
    for width in widths {
        line.extend(std::iter::repeat(BETWEEN_ROWS_SEPARATOR).take(width + 1));
        line.push(TABLE_COL_SEPARATOR);
    }
    line
}
