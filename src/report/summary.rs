//! Cleaning summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// Timed stages of the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleaningStage {
    Normalize,
    PruneColumns,
    PruneRows,
    Reencode,
    Decompose,
}

impl CleaningStage {
    pub fn label(self) -> &'static str {
        match self {
            CleaningStage::Normalize => "Normalize missing values",
            CleaningStage::PruneColumns => "Prune columns",
            CleaningStage::PruneRows => "Prune rows",
            CleaningStage::Reencode => "Re-encode categoricals",
            CleaningStage::Decompose => "Decompose mixed features",
        }
    }
}

/// Summary of what the cleaning pipeline removed and derived
#[derive(Debug, Clone, Default)]
pub struct CleaningSummary {
    pub initial_rows: usize,
    pub initial_columns: usize,
    pub final_rows: usize,
    pub final_columns: usize,
    pub dropped_columns: Vec<String>,
    pub dropped_rows: usize,
    pub multi_level_dropped: Vec<String>,
    pub binary_expanded: Vec<String>,
    pub decomposed: Vec<String>,
    pub residual_dropped: Vec<String>,
    pub timings: Vec<(CleaningStage, Duration)>,
}

impl CleaningSummary {
    pub fn new(initial_rows: usize, initial_columns: usize) -> Self {
        Self {
            initial_rows,
            initial_columns,
            final_rows: initial_rows,
            final_columns: initial_columns,
            ..Default::default()
        }
    }

    pub fn record_time(&mut self, stage: CleaningStage, elapsed: Duration) {
        self.timings.push((stage, elapsed));
    }

    pub fn total_time(&self) -> Duration {
        self.timings.iter().map(|(_, d)| *d).sum()
    }

    /// Share of the original rows that survived row pruning, in percent.
    pub fn retained_row_pct(&self) -> f64 {
        if self.initial_rows > 0 {
            (self.initial_rows - self.dropped_rows) as f64 / self.initial_rows as f64 * 100.0
        } else {
            0.0
        }
    }

    fn count_cell(count: usize) -> Cell {
        Cell::new(count).fg(if count == 0 { Color::White } else { Color::Red })
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CLEANING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Shape"),
            Cell::new(format!("{} x {}", self.initial_rows, self.initial_columns)),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Missing Columns)"),
            Self::count_cell(self.dropped_columns.len()),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Missing Rows)"),
            Self::count_cell(self.dropped_rows),
        ]);
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Multi-level)"),
            Self::count_cell(self.multi_level_dropped.len()),
        ]);
        table.add_row(vec![
            Cell::new("🔀 One-hot Expanded"),
            Cell::new(self.binary_expanded.len()),
        ]);
        table.add_row(vec![
            Cell::new("🧩 Decomposed"),
            Cell::new(self.decomposed.len()),
        ]);
        table.add_row(vec![
            Cell::new("✅ Final Shape"),
            Cell::new(format!("{} x {}", self.final_rows, self.final_columns))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let retained = self.retained_row_pct();
        let color = if retained > 90.0 {
            Color::Green
        } else if retained > 70.0 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new("📉 Rows Retained"),
            Cell::new(format!("{:.1}%", retained))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let groups = [
            ("High Missing Values", &self.dropped_columns),
            ("Multi-level Categoricals", &self.multi_level_dropped),
            ("Residual Mixed Features", &self.residual_dropped),
        ];
        if groups.iter().any(|(_, names)| !names.is_empty()) {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DROPPED FEATURES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            for (title, names) in groups {
                if names.is_empty() {
                    continue;
                }
                println!();
                println!(
                    "      {} {}:",
                    style(title).yellow(),
                    style(format!("({})", names.len())).dim()
                );
                for feature in names {
                    println!("        {} {}", style("•").dim(), feature);
                }
            }
        }
    }

    /// Per-stage timings, printed after the summary table.
    pub fn display_timings(&self) {
        println!();
        for (stage, elapsed) in &self.timings {
            println!(
                "      {:<28} {}",
                stage.label(),
                style(format!("{:.2?}", elapsed)).dim()
            );
        }
        println!(
            "      {:<28} {}",
            style("Total").bold(),
            style(format!("{:.2?}", self.total_time())).dim()
        );
    }
}
