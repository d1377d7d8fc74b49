//! Tabular SELECT output.

use std::fmt::Write;

use crate::datum::Field;

/// A rendered-ready query result: output column names plus projected
/// rows in result order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Field>>,
}

impl QueryResult {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Renders the result as a tab-separated table with a `=` rule under
    /// the header and after the last row.
    pub fn render(&self) -> String {
        let mut header = String::new();
        for column in &self.columns {
            header.push_str(column);
            header.push('\t');
        }
        let rule = "=".repeat(header.chars().count().max(16));

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in &self.rows {
            let mut line = String::new();
            for field in row {
                let _ = write!(line, "{field}\t");
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}
