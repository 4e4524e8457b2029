//! Progress reporting from the extractor into the job store.

use std::sync::Arc;

use crate::download::state::{JobPhase, JobStore};
use crate::error::{Error, Result};
use crate::extract::{ProgressEvent, ProgressSink, ProgressStatus};

/// Turns raw byte progress into job progress and observes pause requests.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    store: Arc<JobStore>,
}

impl ProgressReporter {
    pub fn new(store: Arc<JobStore>) -> Self {
        Self { store }
    }
}

/// Percentage of `event`, when it carries usable counters.
pub fn percentage(event: &ProgressEvent) -> Option<f64> {
    let total = event.total_bytes.or(event.total_bytes_estimate)?;
    let downloaded = event.downloaded_bytes?;
    if total == 0 || downloaded == 0 {
        return None;
    }
    Some((downloaded as f64 / total as f64 * 100.0).min(100.0))
}

impl ProgressSink for ProgressReporter {
    fn on_event(&self, event: ProgressEvent) -> Result<()> {
        if self.store.is_paused() {
            return Err(Error::Cancelled);
        }

        match event.status {
            ProgressStatus::Downloading => {
                if let Some(pct) = percentage(&event) {
                    self.store.report(pct, format!("Downloading... {:.1}%", pct));
                    if self.store.phase() != JobPhase::Downloading {
                        self.store.set_phase(JobPhase::Downloading);
                    }
                }
            }
            ProgressStatus::Finished => {
                self.store.report(100.0, "Finalizing...");
            }
            ProgressStatus::Error => {
                self.store.set_message("Error occurred during download");
            }
        }

        Ok(())
    }
}
