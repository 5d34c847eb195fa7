use std::io::Write;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

fn print_status(style: Style, label: &str, message: &str) {
    let _ = writeln!(std::io::stderr(), "{:>12} {message}", style.apply_to(label));
}

/// Print a right-aligned status line to stderr: `   Resolving mod-a@1.0.0`
///
/// The `label` is bold green; the `message` uses the default terminal colour.
pub fn status(label: &str, message: &str) {
    print_status(Style::new().green().bold(), label, message);
}

/// Like [`status`] but bold cyan, for informational lines.
pub fn status_info(label: &str, message: &str) {
    print_status(Style::new().cyan().bold(), label, message);
}

/// Bold yellow label, for problems that do not abort the command.
pub fn status_warn(label: &str, message: &str) {
    print_status(Style::new().yellow().bold(), label, message);
}

/// Bold red label, for problems that make the command fail.
pub fn status_error(label: &str, message: &str) {
    print_status(Style::new().red().bold(), label, message);
}

/// Create an animated spinner for indeterminate progress.
///
/// Finish it with [`ProgressBar::finish_and_clear`].
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
