//! Terminal styling helpers for the CLI output

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static BOOK: Emoji<'_, '_> = Emoji("📖 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("demoprep").cyan().bold(),
        style("demographic features, cleaned for PCA").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the run configuration card
pub fn print_config(
    input: &Path,
    feature_info: &Path,
    output: &Path,
    max_missing_per_row: usize,
    components: Option<usize>,
) {
    println!("    {}", style("⚙️  Configuration").cyan().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!("      {}Input:         {}", FOLDER, truncate_path(input, 38));
    println!("      {}Feature info:  {}", BOOK, truncate_path(feature_info, 38));
    println!("      {}Output:        {}", SAVE, truncate_path(output, 38));
    println!(
        "      {}Max missing per row: {}",
        CHART,
        style(max_missing_per_row).yellow()
    );
    match components {
        Some(n) => println!("      {}PCA components:      {}", CHART, style(n).yellow()),
        None => println!("      {}PCA:                 {}", CHART, style("skipped").dim()),
    }
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!("      {}", style(format!("⏱  {:.2?}", elapsed)).dim());
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(info) => println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        ),
        None => println!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("demoprep run complete!").green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
