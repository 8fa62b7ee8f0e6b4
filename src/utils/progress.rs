//! Progress indicators for the aggregation pass and the scoring pool

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);
const SPINNER_FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Attach a template to `pb` and start ticking it
fn ticking(pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
    pb.set_style(style);
    pb.enable_steady_tick(TICK);
    pb
}

fn spinner_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap()
        .tick_chars(SPINNER_FRAMES)
}

/// Spinner for a report-writing stage with no measurable length
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ticking(ProgressBar::new_spinner(), spinner_style("   {spinner:.cyan} {msg}"));
    pb.set_message(message.to_string());
    pb
}

/// Spinner that counts rows read from an unbounded sample stream
pub fn create_row_counter() -> ProgressBar {
    ticking(
        ProgressBar::new_spinner(),
        spinner_style("   {spinner:.cyan} Reading samples... {pos} rows [{elapsed}] {msg}"),
    )
}

/// Bar over a known number of features
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("   {msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) [{eta}]")
        .unwrap()
        .progress_chars("=>-");
    let pb = ticking(ProgressBar::new(len), style);
    pb.set_message(message.to_string());
    pb
}

/// Stop the indicator and leave a completed stage line
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Stop the indicator and leave an aborted stage line
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.abandon_with_message(format!("⚠️  {}", message));
}
