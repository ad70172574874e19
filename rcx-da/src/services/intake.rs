//! Document intake service
//!
//! Accepts an uploaded document, validates it before any job exists,
//! allocates an intake job, and runs extraction in a background task.
//! Callers poll the job; on completion the job carries the generated
//! document id and the extraction is readable from the store.

use chrono::Utc;
use rcx_common::{Error, Result};
use tokio::time::Duration;
use uuid::Uuid;

use crate::config::IntakeConfig;
use crate::models::{JobKind, JobState};
use crate::services::extractor;
use crate::store::{ExtractionStore, JobStore};

/// Progress reported once extraction work begins
const PROGRESS_PROCESSING: u8 = 35;
/// Progress reported midway through extraction
const PROGRESS_PARSING: u8 = 70;

/// An uploaded document as received from the HTTP layer
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Shared intake service handle
#[derive(Debug, Clone)]
pub struct IntakeService {
    jobs: JobStore,
    extractions: ExtractionStore,
    config: IntakeConfig,
}

impl IntakeService {
    pub fn new(jobs: JobStore, extractions: ExtractionStore, config: IntakeConfig) -> Self {
        Self {
            jobs,
            extractions,
            config,
        }
    }

    /// Validate an upload without creating any state
    ///
    /// Rejected uploads never allocate a job.
    pub fn validate(&self, upload: &Upload) -> Result<()> {
        if upload.bytes.is_empty() {
            return Err(Error::InvalidInput("Uploaded file is empty".to_string()));
        }
        if upload.bytes.len() > self.config.max_upload_bytes {
            return Err(Error::InvalidInput(format!(
                "File exceeds maximum upload size of {} bytes",
                self.config.max_upload_bytes
            )));
        }
        let declared = upload
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");
        if !self
            .config
            .accepted_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(declared))
        {
            return Err(Error::InvalidInput(format!(
                "Unsupported content type: {}",
                declared
            )));
        }
        Ok(())
    }

    /// Accept a document for extraction
    ///
    /// Returns the intake job id immediately; extraction continues in a
    /// background task.
    pub async fn submit(&self, upload: Upload) -> Result<Uuid> {
        self.validate(&upload)?;

        let job = self.jobs.create(JobKind::Intake).await;
        tracing::info!(
            job_id = %job.job_id,
            file = %upload.file_name,
            size_bytes = upload.bytes.len(),
            "Intake job accepted"
        );

        let service = self.clone();
        let job_id = job.job_id;
        tokio::spawn(async move {
            service.run_extraction(job_id, upload).await;
        });

        Ok(job_id)
    }

    /// Staged extraction: scheduling delay, simulated engine latency,
    /// then store the extraction and complete the job
    async fn run_extraction(&self, job_id: Uuid, upload: Upload) {
        tokio::time::sleep(Duration::from_millis(self.config.queue_delay_ms)).await;
        self.jobs
            .update(job_id, |job| {
                job.transition_to(JobState::Processing);
                job.set_progress(PROGRESS_PROCESSING);
            })
            .await;
        tracing::debug!(job_id = %job_id, "Extraction started");

        let source_hash = extractor::hash_bytes(&upload.bytes);
        let latency = self.config.extract_base_ms
            + extractor::latency_jitter_ms(&source_hash, self.config.extract_jitter_ms);
        tokio::time::sleep(Duration::from_millis(latency / 2)).await;
        self.jobs
            .update(job_id, |job| job.set_progress(PROGRESS_PARSING))
            .await;
        tokio::time::sleep(Duration::from_millis(latency - latency / 2)).await;

        let doc_id = Uuid::new_v4();
        let extraction =
            extractor::parse_document(doc_id, &upload.file_name, &upload.bytes, Utc::now());
        self.extractions.put(extraction).await;

        self.jobs
            .update(job_id, |job| job.complete(Some(doc_id), None, None))
            .await;
        tracing::info!(
            job_id = %job_id,
            doc_id = %doc_id,
            latency_ms = latency,
            "Extraction complete"
        );
    }
}
