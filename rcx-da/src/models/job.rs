//! Asynchronous job state machine
//!
//! Tracks one unit of background work: either a raw intake job or a full
//! RUNE pipeline run. Jobs progress `queued → processing → complete`, or
//! into `error` from either non-terminal state. Terminal records are
//! frozen: the transition methods ignore every mutation after
//! `complete`/`error`, so repeated status polls always observe identical
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of work a job tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Raw document intake (upload → extraction)
    Intake,
    /// Full RUNE pipeline run (intake → map → score → deal)
    Rune,
}

/// Job workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Accepted, waiting for a worker slot
    Queued,
    /// Extraction (and, for RUNE jobs, downstream stages) in flight
    Processing,
    /// Finished successfully
    Complete,
    /// Failed; `error` carries the reason
    Error,
}

impl JobState {
    /// Terminal states admit no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Error)
    }
}

/// Progress a freshly created job starts at
pub const INITIAL_PROGRESS: u8 = 5;

/// One asynchronous unit of work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: Uuid,
    pub kind: JobKind,
    pub state: JobState,
    /// Percent complete, in [0, 100], monotonically non-decreasing
    pub progress: u8,
    /// Document produced by extraction (set on completion)
    pub doc_id: Option<Uuid>,
    /// Deal produced by a RUNE run (set on completion)
    pub deal_id: Option<Uuid>,
    /// Deal Quality Index produced by a RUNE run
    pub dqi: Option<u8>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new job in `queued` state
    pub fn new(kind: JobKind) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4(),
            kind,
            state: JobState::Queued,
            progress: INITIAL_PROGRESS,
            doc_id: None,
            deal_id: None,
            dqi: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to a new state
    ///
    /// Ignored once the job is terminal. Returns whether the transition
    /// was applied.
    pub fn transition_to(&mut self, new_state: JobState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = new_state;
        self.updated_at = Utc::now();
        true
    }

    /// Advance progress, clamped to [0, 100] and never decreasing
    ///
    /// Ignored once the job is terminal.
    pub fn set_progress(&mut self, progress: u8) {
        if self.state.is_terminal() {
            return;
        }
        let clamped = progress.min(100);
        if clamped > self.progress {
            self.progress = clamped;
            self.updated_at = Utc::now();
        }
    }

    /// Mark the job complete with its produced artifacts
    pub fn complete(&mut self, doc_id: Option<Uuid>, deal_id: Option<Uuid>, dqi: Option<u8>) {
        if self.state.is_terminal() {
            return;
        }
        self.progress = 100;
        self.doc_id = doc_id.or(self.doc_id);
        self.deal_id = deal_id.or(self.deal_id);
        self.dqi = dqi.or(self.dqi);
        self.state = JobState::Complete;
        self.updated_at = Utc::now();
    }

    /// Mark the job failed with a human-readable reason
    ///
    /// Failed jobs report progress 100: the run is over, it will not
    /// advance further, and the caller must resubmit.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        self.progress = 100;
        self.error = Some(message.into());
        self.state = JobState::Error;
        self.updated_at = Utc::now();
    }
}
