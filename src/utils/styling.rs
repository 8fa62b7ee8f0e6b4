//! Terminal styling utilities for run output

use console::{style, Emoji};

use crate::cli::Configuration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TAG: Emoji<'_, '_> = Emoji("🏷️  ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("featdiag").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Sparse sample diagnosis: widths, coverage, mutual information").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(config: &Configuration) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let input = config
        .input_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    let tags = if config.group_tags.is_empty() {
        "-".to_string()
    } else {
        config.group_tags.join(",")
    };
    let thresholds = &config.thresholds;

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_string(&input, 38));
    println!("    │  {} Groups: {:<39}│", TAG, truncate_string(&tags, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {} Coverage range:    {:<28}│",
        CHART,
        style(format_range(thresholds.cover_min, thresholds.cover_max)).yellow()
    );
    println!(
        "    │  {} Width range:       {:<28}│",
        CHART,
        style(format_range(thresholds.feature_min, thresholds.feature_max)).yellow()
    );
    println!(
        "    │  {} Mutual info:       {:<28}│",
        LINK,
        style(if config.enable_mi {
            format_range(thresholds.mutual_min, thresholds.mutual_max)
        } else {
            "disabled".to_string()
        })
        .yellow()
    );
    println!("    └{}┘", line);
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

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("featdiag diagnosis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

fn format_range(min: Option<f64>, max: Option<f64>) -> String {
    let bound = |value: Option<f64>| value.map_or("-".to_string(), |v| format!("{:.2}", v));
    format!("{} .. {}", bound(min), bound(max))
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
