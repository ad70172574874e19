//! Job store
//!
//! Keyed map of job records. All mutation goes through [`JobStore::update`]
//! and the job's own transition methods, which enforce the terminal-state
//! freeze and monotonic progress.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Job, JobKind};

/// Shared in-memory job store
#[derive(Debug, Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<Uuid, Job>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh job in `queued` state and return a snapshot of it
    pub async fn create(&self, kind: JobKind) -> Job {
        let job = Job::new(kind);
        self.jobs.write().await.insert(job.job_id, job.clone());
        job
    }

    /// Snapshot a job by id
    pub async fn get(&self, job_id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    /// Apply a mutation to a job under the store lock
    ///
    /// Returns `false` when the id is unknown. The closure operates on
    /// the live record; terminal-state enforcement is the record's own
    /// responsibility.
    pub async fn update<F>(&self, job_id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(&job_id) {
            Some(job) => {
                f(job);
                true
            }
            None => false,
        }
    }

    /// Number of tracked jobs (diagnostics)
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobState;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = JobStore::new();
        let job = store.create(JobKind::Intake).await;

        let fetched = store.get(job.job_id).await.unwrap();
        assert_eq!(fetched.job_id, job.job_id);
        assert_eq!(fetched.state, JobState::Queued);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let store = JobStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn update_mutates_live_record() {
        let store = JobStore::new();
        let job = store.create(JobKind::Rune).await;

        let applied = store
            .update(job.job_id, |j| {
                j.transition_to(JobState::Processing);
                j.set_progress(40);
            })
            .await;
        assert!(applied);

        let fetched = store.get(job.job_id).await.unwrap();
        assert_eq!(fetched.state, JobState::Processing);
        assert_eq!(fetched.progress, 40);
    }

    #[tokio::test]
    async fn update_unknown_id_reports_false() {
        let store = JobStore::new();
        assert!(!store.update(Uuid::new_v4(), |j| j.set_progress(50)).await);
    }
}
