//! Terminal summary table for resolved solutions.
//!
//! ```text
//!   ┌──────┬────────────────────────────────────────┬──────────┐
//!   │ Name │ GUID                                   │ Depends  │
//!   ├──────┼────────────────────────────────────────┼──────────┤
//!   │ app  │ {6F1C...}                              │ core.lib │
//!   └──────┴────────────────────────────────────────┴──────────┘
//! ```

use crate::resolver::Solution;
use std::cmp;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], sanitize(cell).chars().count());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.widths();
        let separator = |left: &str, mid: &str, right: &str| -> String {
            let cells: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}\n", left, cells.join(mid), right)
        };
        let line = |cells: &[String]| -> String {
            let mut out = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let clean = sanitize(cell);
                let padding = width.saturating_sub(clean.chars().count());
                out.push_str(&format!(" {}{} │", clean, " ".repeat(padding)));
            }
            out.push('\n');
            out
        };

        let mut out = separator("┌", "┬", "┐");
        out.push_str(&line(&self.headers));
        out.push_str(&separator("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row));
        }
        out.push_str(&separator("└", "┴", "┘"));
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

/// One row per leaf: name, GUID, artifact and dependencies.
pub fn solution_table(solution: &Solution) -> Table {
    let mut table = Table::new(&["Project", "GUID", "Artifact", "Depends on"]);
    for leaf in &solution.leaves {
        let depends: Vec<&str> = leaf.dependency.depends_on.iter().map(String::as_str).collect();
        table.add_row(vec![
            leaf.name.clone(),
            leaf.dependency.guid.clone(),
            leaf.dependency.artifact.clone(),
            if depends.is_empty() { "-".to_string() } else { depends.join(", ") },
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(&["Name", "Depends"]);
        table.add_row(vec!["app".into(), "core.lib".into()]);
        table.add_row(vec!["too".into(), "many".into(), "cells".into()]);
        let text = table.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  │ Name │ Depends  │");
        assert_eq!(lines[3], "  │ app  │ core.lib │");
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }
}
