//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Job progress bars

pub mod console;
pub mod progress;

pub use console::{
    print_banner, print_error, print_final_status, print_info, print_job_summary, print_json,
    print_success, print_warning,
};
pub use progress::{create_job_bar, create_spinner, update_job_bar};
