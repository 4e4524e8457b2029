//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::StatusSnapshot;

/// Create a spinner for long-running operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner
}

/// Create a percentage bar that mirrors a job's status.
pub fn create_job_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}

/// Copy a status snapshot onto a job bar.
pub fn update_job_bar(bar: &ProgressBar, status: &StatusSnapshot) {
    bar.set_position(status.progress.floor() as u64);
    bar.set_message(status.message.clone());
}
