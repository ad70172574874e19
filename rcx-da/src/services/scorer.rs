//! Deal Quality Index
//!
//! Pure scoring function gating downstream automation. Starts from a
//! base score and applies independent additive adjustments from the
//! mapped DSCR, the debt structure, tenant concentration, and the
//! extraction confidence signals, then clamps to [0, 100]. The
//! thresholds below are the underwriting contract; changing them changes
//! which deals auto-advance.

use std::collections::HashMap;

use crate::models::DocumentExtraction;
use crate::services::mapper::MappedSummary;

/// Every deal starts here before adjustments
pub const BASE_SCORE: i32 = 70;

/// DSCR at or above this earns the strong-coverage bonus (+8)
pub const DSCR_STRONG: f64 = 1.40;
/// DSCR at or above this (below strong) earns +4
pub const DSCR_HEALTHY: f64 = 1.20;
/// DSCR at or above this (below healthy) earns +1; below is -8
pub const DSCR_THIN: f64 = 1.10;

/// Max single-tenant share of base rent before the concentration penalty
pub const TENANT_CONCENTRATION_LIMIT: f64 = 0.40;

/// Section confidence below this draws a penalty
pub const CONFIDENCE_FLOOR: f64 = 0.95;

/// Compute the Deal Quality Index for a scored document
///
/// Adjustments are independent and additive, so application order does
/// not matter. Missing optional inputs never panic; they fall into the
/// conservative branch of their rule.
pub fn deal_quality_index(extraction: &DocumentExtraction, summary: &MappedSummary) -> u8 {
    let mut score = BASE_SCORE;

    score += dscr_adjustment(summary.dscr);

    if floating_without_cap(summary) {
        score -= 5;
    }

    if concentrated_rent_roll(extraction) {
        score -= 5;
    }

    if let Some(rr) = extraction.confidence.rent_roll {
        if rr < CONFIDENCE_FLOOR {
            score -= 2;
        }
    }
    if let Some(ttm) = extraction.confidence.ttm {
        if ttm < CONFIDENCE_FLOOR {
            score -= 1;
        }
    }

    clamp_score(score)
}

/// Tiered DSCR adjustment; missing or sub-threshold coverage is penalized
fn dscr_adjustment(dscr: Option<f64>) -> i32 {
    match dscr {
        Some(d) if d >= DSCR_STRONG => 8,
        Some(d) if d >= DSCR_HEALTHY => 4,
        Some(d) if d >= DSCR_THIN => 1,
        _ => -8,
    }
}

/// Floating-rate debt with no rate cap on record
fn floating_without_cap(summary: &MappedSummary) -> bool {
    let floating = summary
        .debt
        .rate_type
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("floating"));
    let capped = summary
        .debt
        .rate_cap
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    floating && !capped
}

/// Whether any single tenant holds more than the concentration limit of
/// total base rent
fn concentrated_rent_roll(extraction: &DocumentExtraction) -> bool {
    if extraction.rent_roll.is_empty() {
        return false;
    }

    let mut per_tenant: HashMap<&str, f64> = HashMap::new();
    let mut total = 0.0;
    for entry in &extraction.rent_roll {
        let rent = entry.base_rent.unwrap_or(0.0);
        *per_tenant.entry(entry.tenant.as_str()).or_insert(0.0) += rent;
        total += rent;
    }
    if total <= 0.0 {
        return false;
    }

    per_tenant
        .values()
        .any(|&rent| rent / total > TENANT_CONCENTRATION_LIMIT)
}

/// Clamp a raw additive score into the [0, 100] contract
fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ConfidenceScores, DebtTerms, DocumentType, OperatingTotals, RentRollEntry,
    };
    use chrono::Utc;
    use uuid::Uuid;

    fn extraction(
        rent_roll: Vec<(&str, f64)>,
        confidence: ConfidenceScores,
    ) -> DocumentExtraction {
        DocumentExtraction {
            doc_id: Uuid::new_v4(),
            document_type: DocumentType::TtmOperatingStatement,
            source_file: "statement.pdf".to_string(),
            source_hash: "deadbeef".to_string(),
            line_items: Vec::new(),
            totals: OperatingTotals::default(),
            rent_roll: rent_roll
                .into_iter()
                .enumerate()
                .map(|(i, (tenant, rent))| RentRollEntry {
                    unit: format!("Suite {}", 100 + i),
                    tenant: tenant.to_string(),
                    area_sqft: None,
                    lease_start: None,
                    lease_end: None,
                    base_rent: Some(rent),
                })
                .collect(),
            debt_terms: DebtTerms::default(),
            covenants: Vec::new(),
            assumptions: Vec::new(),
            validation_checks: Vec::new(),
            confidence,
            extracted_at: Utc::now(),
        }
    }

    fn summary(dscr: Option<f64>, debt: DebtTerms) -> MappedSummary {
        MappedSummary {
            noi: None,
            dscr,
            walt_years: None,
            debt,
        }
    }

    fn full_confidence() -> ConfidenceScores {
        ConfidenceScores {
            rent_roll: Some(1.0),
            ttm: Some(1.0),
        }
    }

    #[test]
    fn strong_coverage_composite_scores_78() {
        // dscr 1.5, fixed rate, max tenant share 0.35, full confidence
        let x = extraction(
            vec![("Alpha", 300.0), ("Beta", 350.0), ("Gamma", 350.0)],
            full_confidence(),
        );
        let s = summary(
            Some(1.5),
            DebtTerms {
                rate_type: Some("fixed".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(deal_quality_index(&x, &s), 78);
    }

    #[test]
    fn dscr_tier_boundaries_are_inclusive_at_the_bottom() {
        assert_eq!(dscr_adjustment(Some(1.40)), 8);
        assert_eq!(dscr_adjustment(Some(1.39999)), 4);
        assert_eq!(dscr_adjustment(Some(1.20)), 4);
        assert_eq!(dscr_adjustment(Some(1.19999)), 1);
        assert_eq!(dscr_adjustment(Some(1.10)), 1);
        assert_eq!(dscr_adjustment(Some(1.09999)), -8);
        assert_eq!(dscr_adjustment(Some(0.0)), -8);
        assert_eq!(dscr_adjustment(None), -8);
    }

    #[test]
    fn floating_rate_without_cap_is_penalized() {
        let x = extraction(Vec::new(), full_confidence());

        let uncapped = summary(
            Some(1.5),
            DebtTerms {
                rate_type: Some("Floating".to_string()),
                rate_cap: None,
                ..Default::default()
            },
        );
        assert_eq!(deal_quality_index(&x, &uncapped), 73); // 70 + 8 - 5

        let blank_cap = summary(
            Some(1.5),
            DebtTerms {
                rate_type: Some("floating".to_string()),
                rate_cap: Some("   ".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(deal_quality_index(&x, &blank_cap), 73);

        let capped = summary(
            Some(1.5),
            DebtTerms {
                rate_type: Some("floating".to_string()),
                rate_cap: Some("3.5% strike".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(deal_quality_index(&x, &capped), 78);
    }

    #[test]
    fn tenant_concentration_over_40_percent_is_penalized() {
        // 0.45 share across two units of the same tenant
        let concentrated = extraction(
            vec![("Anchor", 250.0), ("Anchor", 200.0), ("Other", 550.0)],
            full_confidence(),
        );
        let s = summary(Some(1.5), DebtTerms::default());
        assert_eq!(deal_quality_index(&concentrated, &s), 73); // 70 + 8 - 5

        // Exactly 0.40 does not trip the penalty
        let at_limit = extraction(
            vec![("Anchor", 400.0), ("Other", 600.0)],
            full_confidence(),
        );
        assert_eq!(deal_quality_index(&at_limit, &s), 78);

        // Empty rent roll never trips it
        let empty = extraction(Vec::new(), full_confidence());
        assert_eq!(deal_quality_index(&empty, &s), 78);
    }

    #[test]
    fn confidence_penalties_apply_only_when_present() {
        let s = summary(Some(1.5), DebtTerms::default());

        let low_both = extraction(
            Vec::new(),
            ConfidenceScores {
                rent_roll: Some(0.90),
                ttm: Some(0.94),
            },
        );
        assert_eq!(deal_quality_index(&low_both, &s), 75); // 70 + 8 - 2 - 1

        let missing_both = extraction(
            Vec::new(),
            ConfidenceScores {
                rent_roll: None,
                ttm: None,
            },
        );
        assert_eq!(deal_quality_index(&missing_both, &s), 78);
    }

    #[test]
    fn worst_case_input_stays_in_range() {
        // Missing dscr, uncapped floating debt, concentrated roll, low
        // confidence on both sections: 70 - 8 - 5 - 5 - 2 - 1 = 49
        let x = extraction(
            vec![("Anchor", 900.0), ("Other", 100.0)],
            ConfidenceScores {
                rent_roll: Some(0.5),
                ttm: Some(0.5),
            },
        );
        let s = summary(
            None,
            DebtTerms {
                rate_type: Some("floating".to_string()),
                ..Default::default()
            },
        );
        let score = deal_quality_index(&x, &s);
        assert_eq!(score, 49);
    }

    #[test]
    fn clamp_bounds_raw_scores() {
        assert_eq!(clamp_score(-12), 0);
        assert_eq!(clamp_score(0), 0);
        assert_eq!(clamp_score(49), 49);
        assert_eq!(clamp_score(100), 100);
        assert_eq!(clamp_score(137), 100);
    }
}
