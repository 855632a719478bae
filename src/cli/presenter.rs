//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Handle for updating the spinner from callbacks on other threads
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format the recording countdown line
    pub fn format_countdown(remaining_secs: u64, total_secs: u64) -> String {
        let elapsed = total_secs.saturating_sub(remaining_secs);
        let percent = if total_secs > 0 {
            (elapsed as f64 / total_secs as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        // Build progress bar
        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] Remaining: {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            remaining_secs
        )
    }

    /// Spinner message while recording
    pub fn countdown_message(remaining_secs: u64, total_secs: u64) -> String {
        format!(
            "Recording... {}",
            Self::format_countdown(remaining_secs, total_secs)
        )
    }

    /// Print the interactive menu
    pub fn menu(&self) {
        println!();
        println!("{}", "Menu:".bold());
        println!("1. List audio sources");
        println!("2. Record audio");
        println!("3. Exit");
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_countdown_at_start() {
        let line = Presenter::format_countdown(10, 10);
        assert!(line.contains("Remaining: 10s"));
        assert!(!line.contains('█'));
    }

    #[test]
    fn format_countdown_at_half() {
        let line = Presenter::format_countdown(5, 10);
        assert!(line.contains("Remaining: 5s"));
    }

    #[test]
    fn format_countdown_handles_zero_total() {
        let line = Presenter::format_countdown(0, 0);
        assert!(line.contains("Remaining: 0s"));
    }

    #[test]
    fn countdown_message_prefix() {
        let message = Presenter::countdown_message(3, 10);
        assert!(message.starts_with("Recording..."));
        assert!(message.contains("Remaining: 3s"));
    }
}
