//! In-memory keyed stores
//!
//! Process-lifetime storage for jobs, extractions, and deals. Each store
//! is an explicit handle (cheap to clone, shared via `Arc`) that is
//! constructor-injected into the services that use it, so tests can
//! build an isolated world per case and a durable backend can replace
//! the map without touching callers. Nothing here survives a restart.

pub mod deals;
pub mod extractions;
pub mod jobs;

pub use deals::DealStore;
pub use extractions::ExtractionStore;
pub use jobs::JobStore;
