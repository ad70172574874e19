//! RUNE pipeline orchestrator
//!
//! Composes intake → extraction wait → mapping → scoring → deal
//! creation into one long-running job trackable by polling. The caller
//! gets a RUNE job id back immediately; the run proceeds in a background
//! task whose failures all fold into the job record. Runs are fully
//! independent of each other.

use chrono::Utc;
use rcx_common::Result;
use thiserror::Error;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::models::{Deal, DocumentExtraction, JobKind, JobState};
use crate::services::intake::{IntakeService, Upload};
use crate::services::{mapper, scorer};
use crate::store::{DealStore, ExtractionStore, JobStore};

/// A RUNE job's mirrored progress is capped here until the run itself
/// finishes
const RUNE_PROGRESS_CAP: u8 = 95;

/// Failures terminal to a single pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The bounded poll window closed without an extraction appearing.
    /// Fatal for the run; the caller must resubmit.
    #[error("Extraction did not complete within {attempts} polls over {window_ms} ms; resubmit the document")]
    ExtractionTimeout { attempts: u32, window_ms: u64 },

    /// The intake job itself reported failure
    #[error("Intake failed: {0}")]
    IntakeFailed(String),
}

/// Shared orchestrator handle
#[derive(Debug, Clone)]
pub struct RunePipeline {
    jobs: JobStore,
    extractions: ExtractionStore,
    deals: DealStore,
    intake: IntakeService,
    config: PipelineConfig,
    shutdown: CancellationToken,
}

impl RunePipeline {
    pub fn new(
        jobs: JobStore,
        extractions: ExtractionStore,
        deals: DealStore,
        intake: IntakeService,
        config: PipelineConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            jobs,
            extractions,
            deals,
            intake,
            config,
            shutdown,
        }
    }

    /// Start a pipeline run for an uploaded document
    ///
    /// Validation happens before the RUNE job is allocated, so a rejected
    /// upload leaves no trace. Returns the RUNE job id; the caller polls
    /// it to observe the run.
    pub async fn submit(&self, upload: Upload) -> Result<Uuid> {
        self.intake.validate(&upload)?;

        let rune_job = self.jobs.create(JobKind::Rune).await;
        let rune_id = rune_job.job_id;
        tracing::info!(
            rune_job_id = %rune_id,
            file = %upload.file_name,
            "Pipeline run accepted"
        );

        let pipeline = self.clone();
        tokio::spawn(async move {
            pipeline.run(rune_id, upload).await;
        });

        Ok(rune_id)
    }

    /// Execute one pipeline run to a terminal job state
    async fn run(&self, rune_id: Uuid, upload: Upload) {
        let intake_job_id = match self.intake.submit(upload).await {
            Ok(id) => id,
            Err(e) => {
                // Upload was pre-validated, so this is an internal fault
                self.fail(rune_id, PipelineError::IntakeFailed(e.to_string()).to_string())
                    .await;
                return;
            }
        };

        match self.await_extraction(rune_id, intake_job_id).await {
            Ok(Some(extraction)) => self.finalize(rune_id, extraction).await,
            Ok(None) => {
                // Terminal outcome already recorded (intake failure, shutdown)
            }
            Err(e) => self.fail(rune_id, e.to_string()).await,
        }
    }

    /// Bounded poll for the intake job and its extraction
    ///
    /// Mirrors intake progress into the RUNE job (capped until the run
    /// finishes) and moves it to `processing` on first observation. An
    /// intake job id that is not yet visible is tolerated, but only
    /// inside this window. `Ok(None)` means the run already reached a
    /// terminal state here.
    async fn await_extraction(
        &self,
        rune_id: Uuid,
        intake_job_id: Uuid,
    ) -> std::result::Result<Option<DocumentExtraction>, PipelineError> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        for attempt in 1..=self.config.poll_attempts {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::warn!(rune_job_id = %rune_id, "Run aborted by service shutdown");
                    self.fail(rune_id, "Service shutting down".to_string()).await;
                    return Ok(None);
                }
                _ = tokio::time::sleep(interval) => {}
            }

            let Some(intake_job) = self.jobs.get(intake_job_id).await else {
                tracing::debug!(
                    rune_job_id = %rune_id,
                    intake_job_id = %intake_job_id,
                    attempt,
                    "Intake job not yet visible"
                );
                continue;
            };

            let mirrored = intake_job.progress.min(RUNE_PROGRESS_CAP);
            self.jobs
                .update(rune_id, |job| {
                    job.transition_to(JobState::Processing);
                    job.set_progress(mirrored);
                })
                .await;

            if intake_job.state == JobState::Error {
                return Err(PipelineError::IntakeFailed(
                    intake_job
                        .error
                        .unwrap_or_else(|| "unknown intake error".to_string()),
                ));
            }

            if let Some(doc_id) = intake_job.doc_id {
                if let Some(extraction) = self.extractions.get(doc_id).await {
                    return Ok(Some(extraction));
                }
                tracing::debug!(
                    rune_job_id = %rune_id,
                    doc_id = %doc_id,
                    attempt,
                    "Extraction not yet stored"
                );
            }
        }

        Err(PipelineError::ExtractionTimeout {
            attempts: self.config.poll_attempts,
            window_ms: u64::from(self.config.poll_attempts) * self.config.poll_interval_ms,
        })
    }

    /// Map, score, create the deal, and complete the RUNE job
    async fn finalize(&self, rune_id: Uuid, extraction: DocumentExtraction) {
        let summary = mapper::map_extraction(&extraction, Utc::now().date_naive());
        let dqi = scorer::deal_quality_index(&extraction, &summary);

        let deal = Deal::draft(deal_name(&extraction), extraction.doc_id, dqi, summary);
        let deal_id = deal.deal_id;
        self.deals.put(deal).await;

        self.jobs
            .update(rune_id, |job| {
                job.complete(Some(extraction.doc_id), Some(deal_id), Some(dqi));
            })
            .await;
        tracing::info!(
            rune_job_id = %rune_id,
            doc_id = %extraction.doc_id,
            deal_id = %deal_id,
            dqi,
            "Pipeline run complete"
        );
    }

    async fn fail(&self, rune_id: Uuid, message: String) {
        tracing::warn!(rune_job_id = %rune_id, error = %message, "Pipeline run failed");
        self.jobs.update(rune_id, |job| job.fail(message)).await;
    }
}

/// Display name for a synthesized deal, derived from the upload's file
/// stem (fallback: short document id)
fn deal_name(extraction: &DocumentExtraction) -> String {
    let stem = extraction
        .source_file
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(&extraction.source_file)
        .replace(['_', '-'], " ");
    let stem = stem.trim();
    if stem.is_empty() {
        let id = extraction.doc_id.simple().to_string();
        format!("Deal {}", &id[..8])
    } else {
        format!("{} Deal", stem)
    }
}
