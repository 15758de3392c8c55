// src/utils/console.rs

//! Console output for progress and summaries.
//!
//! Diagnostic messages go through the `log` facade; this module only owns
//! the human-facing lines: a header, a single self-overwriting progress line,
//! and the final summary block.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

/// Whether progress lines are printed.
static SHOW_PROGRESS: AtomicBool = AtomicBool::new(true);

/// Whether the cursor currently sits at the end of a progress line.
static PROGRESS_OPEN: AtomicBool = AtomicBool::new(false);

/// Width cleared before each progress update.
const PROGRESS_WIDTH: usize = 70;

/// Configure console output.
pub fn init(show_progress: bool) {
    SHOW_PROGRESS.store(show_progress, Ordering::Relaxed);
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Log a header
pub fn header(title: &str) {
    finish_progress();
    let border = "═".repeat(60);
    println!("{}", border);
    println!("  {}", title);
    println!("{}", border);
}

/// Overwrite the current progress line.
pub fn progress(message: &str) {
    if !SHOW_PROGRESS.load(Ordering::Relaxed) {
        return;
    }
    print!("\r{:width$}\r{}", "", message, width = PROGRESS_WIDTH);
    let _ = std::io::stdout().flush();
    PROGRESS_OPEN.store(true, Ordering::Relaxed);
}

/// Terminate an open progress line so later output starts clean.
pub fn finish_progress() {
    if PROGRESS_OPEN.swap(false, Ordering::Relaxed) {
        println!();
    }
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    finish_progress();
    println!("{}", "=".repeat(17));
    println!("[{}] [SUMMARY] {}", timestamp(), title);
    for (key, value) in items {
        println!("    {}: {}", key, value);
    }
}

/// Format a progress line: `<prefix> <pages> <figures> <regenerated> <title>`.
pub fn progress_line(
    prefix: &str,
    pages: u64,
    figures: u64,
    regenerated: u64,
    title: &str,
) -> String {
    let line = format!("{prefix} {pages} {figures} {regenerated} {title}");
    match line.char_indices().nth(PROGRESS_WIDTH) {
        Some((cut, _)) => line[..cut].to_string(),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_format() {
        assert_eq!(progress_line("enwiki", 3, 10, 2, "Foo"), "enwiki 3 10 2 Foo");
    }

    #[test]
    fn test_progress_line_truncates_long_titles() {
        let title = "é".repeat(200);
        let line = progress_line("enwiki", 1, 1, 1, &title);
        assert_eq!(line.chars().count(), PROGRESS_WIDTH);
    }
}
