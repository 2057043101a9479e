//! Table formatting utilities for CLI list commands
//!
//! One formatter renders every entity list in tsv, csv, markdown or id
//! form. Tables render to a `String` so the same rows can be printed or
//! tested.

use chrono::NaiveDate;
use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::entity::Status;
use crate::core::identity::{EntityId, EntityKind};

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Record id (cyan)
    Id(EntityId),
    /// Plain text, truncated to the column width
    Text(String),
    /// Active/inactive with color coding
    Status(Status),
    Number(i64),
    /// Displayed as dd/mm/yyyy, exported as yyyy-mm-dd
    Date(NaiveDate),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    Status::Active => style(&s).green(),
                    Status::Inactive => style(&s).red().dim(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Empty => format!("{:<width$}", "-", width = width),
            other => format!("{:<width$}", other.display(), width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        match self {
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
            other => escape_csv(&other.raw()),
        }
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        self.display().replace('|', "\\|")
    }

    /// Get raw string value (no formatting)
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Human text as shown in tables
    pub fn display(&self) -> String {
        match self {
            CellValue::Date(d) => d.format("%d/%m/%Y").to_string(),
            CellValue::Empty => "-".to_string(),
            other => other.raw(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Date(_) => 10,
            CellValue::Empty => 1,
            other => other.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: Option<EntityId>,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(id: Option<EntityId>) -> Self {
        Self {
            id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Display text of every column, in column order
    pub fn texts(&self, columns: &[ColumnDef]) -> Vec<String> {
        columns
            .iter()
            .map(|col| self.get(col.key).map_or_else(|| "-".to_string(), CellValue::display))
            .collect()
    }
}

/// Table formatter that renders rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    kind: EntityKind,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], kind: EntityKind) -> Self {
        Self {
            columns,
            kind,
            show_summary: true,
        }
    }

    /// Drop the trailing "N found" line (for piping)
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Print rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            OutputFormat::Id => self.render_ids(rows),
            _ => self.render_tsv(rows),
        }
    }

    /// Calculate dynamic column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                // +2 leaves room for truncation, capped at the column's width
                col.header
                    .len()
                    .max(max_content.saturating_add(2))
                    .min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = *w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| match row.get(col.key) {
                    Some(value) => value.format_tsv(*w),
                    None => format!("{:<width$}", "-", width = *w),
                })
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!(
                "{} {} found\n",
                style(rows.len()).cyan(),
                if rows.len() == 1 {
                    self.kind.singular()
                } else {
                    self.kind.plural()
                }
            ));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(CellValue::format_csv).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));
        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map_or_else(|| "-".to_string(), CellValue::format_md))
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }

    fn render_ids(&self, rows: &[TableRow]) -> String {
        rows.iter()
            .filter_map(|row| row.id)
            .map(|id| format!("{}\n", id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 6),
        ColumnDef::new("name", "NAME", 20),
        ColumnDef::new("hours", "HOURS", 8),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new(Some(EntityId::new(1).unwrap()))
                .cell("id", CellValue::Id(EntityId::new(1).unwrap()))
                .cell("name", CellValue::Text("Álgebra, Linear".to_string()))
                .cell("hours", CellValue::Text("4h".to_string())),
            TableRow::new(Some(EntityId::new(2).unwrap()))
                .cell("id", CellValue::Id(EntityId::new(2).unwrap()))
                .cell("name", CellValue::Text("A | B".to_string())),
        ]
    }

    #[test]
    fn test_cell_value_formats() {
        let date = CellValue::Date(NaiveDate::from_ymd_opt(2005, 3, 14).unwrap());
        assert_eq!(date.display(), "14/03/2005");
        assert_eq!(date.format_csv(), "2005-03-14");
        assert_eq!(CellValue::Empty.display(), "-");
        assert_eq!(CellValue::Empty.format_csv(), "");
        assert_eq!(CellValue::Status(Status::Inactive).raw(), "inactive");
        assert_eq!(CellValue::Text("a,b".to_string()).format_csv(), "\"a,b\"");
    }

    #[test]
    fn test_md_escapes_pipes_and_fills_missing() {
        let md = TableFormatter::new(COLUMNS, EntityKind::Subject).render(&rows(), OutputFormat::Md);
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "| ID | NAME | HOURS |");
        assert_eq!(lines[1], "|---|---|---|");
        assert_eq!(lines[3], "| 2 | A \\| B | - |");
    }

    #[test]
    fn test_csv_output() {
        let csv = TableFormatter::new(COLUMNS, EntityKind::Subject).render(&rows(), OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,hours");
        assert_eq!(lines[1], "1,\"Álgebra, Linear\",4h");
        assert_eq!(lines[2], "2,A | B,");
    }

    #[test]
    fn test_id_output() {
        let ids = TableFormatter::new(COLUMNS, EntityKind::Subject).render(&rows(), OutputFormat::Id);
        assert_eq!(ids, "1\n2\n");
    }

    #[test]
    fn test_tsv_summary() {
        let formatter = TableFormatter::new(COLUMNS, EntityKind::Subject);
        let tsv = formatter.render(&rows(), OutputFormat::Tsv);
        assert!(tsv.contains("2 subjects found"));

        let piped = TableFormatter::new(COLUMNS, EntityKind::Subject)
            .without_summary()
            .render(&rows(), OutputFormat::Tsv);
        assert!(!piped.contains("found"));
    }

    #[test]
    fn test_row_texts_follow_columns() {
        let texts = rows()[1].texts(COLUMNS);
        assert_eq!(texts, vec!["2", "A | B", "-"]);
    }
}
