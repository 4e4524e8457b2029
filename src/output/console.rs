//! Console output utilities.

use console::style;

use crate::download::{JobPhase, StatusSnapshot};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     mediagrab                                         ║
║     Fetch, convert and tag media from the web         ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the settings a download runs with.
pub fn print_job_summary(url: &str, mode: &str, quality: &str, folder: &str) {
    println!();
    println!("{}", style("Download:").bold());
    println!("  URL: {}", url);
    println!("  Mode: {}", mode);
    println!("  Quality: {}", quality);
    println!("  Folder: {}", folder);
    println!();
}

/// Print the final state of a job.
pub fn print_final_status(status: &StatusSnapshot) {
    match (status.phase, &status.current_file) {
        (JobPhase::Done, Some(file)) => print_success(&format!("{} ({})", status.message, file)),
        (JobPhase::Done, None) => print_success(&status.message),
        (JobPhase::Failed, _) => print_error(&status.message),
        _ => print_warning(&status.message),
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Could not encode output: {}", e)),
    }
}
