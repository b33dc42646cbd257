use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as CellColor, Table, presets};
use serde::Serialize;
use trackgen_build::Category;

use crate::theme::{GLYPHS, PALETTE, category_color};

/// How command results are printed.
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Human-readable lines and tables
    #[default]
    Table,
    /// A single JSON document on stdout
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConsoleOptions {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Outcome attached to a printed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Written,
    Unchanged,
    Warning,
    Note,
}

impl Status {
    fn glyph(self) -> &'static str {
        match self {
            Status::Written => GLYPHS.written,
            Status::Unchanged => GLYPHS.unchanged,
            Status::Warning => GLYPHS.warning,
            Status::Note => GLYPHS.note,
        }
    }

    fn color(self) -> Color {
        match self {
            Status::Written => PALETTE.written,
            Status::Unchanged => PALETTE.unchanged,
            Status::Warning => PALETTE.warning,
            Status::Note => PALETTE.note,
        }
    }
}

pub struct Console {
    options: ConsoleOptions,
}

impl Console {
    pub fn new(options: ConsoleOptions) -> Self {
        Self { options }
    }

    pub fn is_json(&self) -> bool {
        self.options.format == OutputFormat::Json
    }

    /// Pretty JSON on stdout. Printed even with `--quiet`.
    pub fn json<T: Serialize>(&self, data: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(data)?);
        Ok(())
    }

    pub fn status(&self, status: Status, message: &str) {
        self.print(&self.status_line(status, message, 0));
    }

    /// Status line nested under a title.
    pub fn item(&self, status: Status, message: &str) {
        self.print(&self.status_line(status, message, 2));
    }

    /// Diagnostics on stderr, only with `--verbose`.
    pub fn trace(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            eprintln!("{} {}", self.paint(GLYPHS.arrow, PALETTE.dim), self.paint(message, PALETTE.dim));
        }
    }

    pub fn title(&self, text: &str) {
        let line = if self.options.no_color {
            format!("\n{text}\n{}", "-".repeat(text.chars().count()))
        } else {
            format!("\n{}", text.color(PALETTE.title).bold())
        };
        self.print(&line);
    }

    /// Table with a bold header row.
    pub fn grid(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.load_preset(if self.options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        });
        table.set_header(headers.iter().map(|header| {
            let cell = Cell::new(header).add_attribute(Attribute::Bold);
            if self.options.no_color { cell } else { cell.fg(CellColor::Cyan) }
        }));
        table
    }

    /// Category label, colored by category.
    pub fn category_cell(&self, category: Category) -> Cell {
        let cell = Cell::new(category.label());
        if self.options.no_color { cell } else { cell.fg(category_color(category)) }
    }

    pub fn show(&self, table: &Table) {
        self.print(&table.to_string());
    }

    fn status_line(&self, status: Status, message: &str, indent: usize) -> String {
        let glyph = self.paint(status.glyph(), status.color());
        // nested items keep the message plain unless dimmed
        let message = if indent == 0 || status == Status::Unchanged {
            self.paint(message, status.color())
        } else {
            message.to_string()
        };
        format!("{:indent$}{glyph} {message}", "")
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.no_color {
            text.to_string()
        } else {
            text.color(color).to_string()
        }
    }

    fn print(&self, line: &str) {
        if !self.options.quiet {
            println!("{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Console {
        Console::new(ConsoleOptions {
            no_color: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_grid_has_header() {
        let console = plain();
        let mut table = console.grid(&["Field", "Category"]);
        table.add_row(vec![Cell::new("name"), console.category_cell(Category::Primitive)]);
        let rendered = table.to_string();
        assert!(rendered.contains("Field"));
        assert!(rendered.contains("primitive"));
    }

    #[test]
    fn test_status_lines_without_color() {
        let console = plain();
        assert_eq!(console.status_line(Status::Written, "clone.rs", 2), "  ✓ clone.rs");
        assert_eq!(console.status_line(Status::Warning, "no structs", 0), "⚠ no structs");
    }

    #[test]
    fn test_json_mode() {
        let console = Console::new(ConsoleOptions {
            format: OutputFormat::Json,
            quiet: true,
            ..Default::default()
        });
        assert!(console.is_json());
        assert!(console.json(&vec!["a", "b"]).is_ok());
    }
}
