//! Job state tracking.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::fs::display_name;

/// Identifier of one job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage a job is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    #[default]
    Idle,
    Starting,
    Extracting,
    Downloading,
    PostProcessing,
    Done,
    Failed,
    Paused,
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Finished; `file` is unset when the output could not be located.
    Succeeded { file: Option<PathBuf> },
    Cancelled,
    Failed(String),
}

impl JobOutcome {
    pub fn from_result(result: Result<Option<PathBuf>>) -> Self {
        match result {
            Ok(file) => JobOutcome::Succeeded { file },
            Err(Error::Cancelled) => JobOutcome::Cancelled,
            Err(e) => JobOutcome::Failed(e.headline()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }
}

/// Mutable part of the job state.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub progress: f64,
    pub current_file: Option<String>,
    pub message: String,
    pub title: Option<String>,
    pub phase: JobPhase,
    pub job_id: Option<JobId>,
}

/// Point-in-time copy of the job state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub is_downloading: bool,
    pub is_paused: bool,
    pub progress: f64,
    pub message: String,
    pub current_file: Option<String>,
    pub title: Option<String>,
    pub phase: JobPhase,
    pub job_id: Option<JobId>,
}

/// The single job-state store shared by the worker and status readers.
#[derive(Debug, Default)]
pub struct JobStore {
    active: AtomicBool,
    paused: AtomicBool,
    state: RwLock<JobState>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, JobState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Flip the pause flag, returning the new value.
    pub fn toggle_paused(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    /// Claim the store for a new job.
    ///
    /// Exactly one caller wins while a job is active; the returned guard
    /// releases the claim when dropped.
    pub fn try_begin(self: &Arc<Self>) -> Result<(JobId, ActiveGuard)> {
        self.active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::JobActive)?;

        let id = JobId::new();
        self.paused.store(false, Ordering::SeqCst);
        {
            let mut state = self.write();
            state.progress = 0.0;
            state.message = "Starting download...".to_string();
            state.current_file = None;
            state.phase = JobPhase::Starting;
            state.job_id = Some(id);
        }

        Ok((
            id,
            ActiveGuard {
                store: Arc::clone(self),
            },
        ))
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.write().message = message.into();
    }

    pub fn set_phase(&self, phase: JobPhase) {
        self.write().phase = phase;
    }

    pub fn phase(&self) -> JobPhase {
        self.read().phase
    }

    /// Raise progress to `value`; lower values are ignored.
    pub fn set_progress(&self, value: f64) {
        let value = value.clamp(0.0, 100.0);
        let mut state = self.write();
        if value > state.progress {
            state.progress = value;
        }
    }

    /// Set progress and message together.
    pub fn report(&self, progress: f64, message: impl Into<String>) {
        let value = progress.clamp(0.0, 100.0);
        let mut state = self.write();
        if value > state.progress {
            state.progress = value;
        }
        state.message = message.into();
    }

    pub fn set_title(&self, title: Option<String>) {
        self.write().title = title;
    }

    pub fn title(&self) -> Option<String> {
        self.read().title.clone()
    }

    /// Write the terminal state for `outcome`.
    pub fn record_outcome(&self, outcome: &JobOutcome) {
        let mut state = self.write();
        match outcome {
            JobOutcome::Succeeded { file } => {
                state.progress = 100.0;
                state.message = "Download complete!".to_string();
                if let Some(file) = file {
                    state.current_file = Some(display_name(file));
                }
                state.phase = JobPhase::Done;
            }
            JobOutcome::Cancelled => {
                state.message = "Download paused".to_string();
                state.phase = JobPhase::Paused;
            }
            JobOutcome::Failed(message) => {
                state.message = format!("Error: {}", message);
                state.phase = JobPhase::Failed;
            }
        }
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let state = self.read();
        StatusSnapshot {
            is_downloading: self.is_active(),
            is_paused: self.is_paused(),
            progress: state.progress,
            message: state.message.clone(),
            current_file: state.current_file.clone(),
            title: state.title.clone(),
            phase: state.phase,
            job_id: state.job_id,
        }
    }
}

/// Releases the store's active flag when the job ends, however it ends.
#[derive(Debug)]
pub struct ActiveGuard {
    store: Arc<JobStore>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.store.active.store(false, Ordering::SeqCst);
    }
}
