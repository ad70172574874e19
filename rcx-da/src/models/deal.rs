//! Deal records
//!
//! The terminal artifact of a successful RUNE pipeline run. Created
//! exactly once per run; downstream stages (review, funding) mutate the
//! record later through their own services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::mapper::MappedSummary;

/// Multiple of NOI used to size the target raise (a fixed 10% cap rate)
pub const TARGET_RAISE_NOI_MULTIPLE: f64 = 10.0;

/// Deal lifecycle stage
///
/// New deals always start at `Draft`; later stages are advanced by the
/// listing and funding workflows, not by the intake pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DealStage {
    Draft,
    Review,
    Funding,
    Closed,
}

/// A tokenizable deal synthesized from one underwritten document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: Uuid,
    pub name: String,
    pub stage: DealStage,
    /// Deal Quality Index, [0, 100]
    pub dqi: u8,
    /// Capital raise target derived from mapped NOI (0 when NOI unknown)
    pub target_raise: f64,
    /// Percent funded, starts at 0
    pub funding_progress: u8,
    /// Source document this deal was underwritten from
    pub doc_id: Uuid,
    pub summary: MappedSummary,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    /// Synthesize a draft deal from a scored document
    pub fn draft(name: String, doc_id: Uuid, dqi: u8, summary: MappedSummary) -> Self {
        let target_raise = summary
            .noi
            .map(|noi| noi * TARGET_RAISE_NOI_MULTIPLE)
            .unwrap_or(0.0);
        Self {
            deal_id: Uuid::new_v4(),
            name,
            stage: DealStage::Draft,
            dqi,
            target_raise,
            funding_progress: 0,
            doc_id,
            summary,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_deal_sizes_raise_from_noi() {
        let summary = MappedSummary {
            noi: Some(1_120_000.0),
            ..Default::default()
        };
        let deal = Deal::draft("Test Deal".to_string(), Uuid::new_v4(), 78, summary);

        assert_eq!(deal.stage, DealStage::Draft);
        assert_eq!(deal.target_raise, 11_200_000.0);
        assert_eq!(deal.funding_progress, 0);
    }

    #[test]
    fn draft_deal_without_noi_has_zero_raise() {
        let deal = Deal::draft(
            "No NOI".to_string(),
            Uuid::new_v4(),
            62,
            MappedSummary::default(),
        );
        assert_eq!(deal.target_raise, 0.0);
    }
}
