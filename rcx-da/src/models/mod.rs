//! Data models for rcx-da (Deal Automation microservice)

pub mod deal;
pub mod extraction;
pub mod job;

pub use deal::{Deal, DealStage};
pub use extraction::{
    AssumptionNote, ConfidenceScores, Covenant, DebtTerms, DocumentExtraction, DocumentType,
    LineItem, OperatingTotals, RentRollEntry, ValidationCheck,
};
pub use job::{Job, JobKind, JobState};
