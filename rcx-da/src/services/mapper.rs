//! Extraction → normalized financial summary
//!
//! Pure, deterministic transform from a raw [`DocumentExtraction`] to the
//! normalized summary the scorer and deal record consume. No I/O, no
//! clock reads: the WALT reference date is an explicit argument, so
//! identical inputs always produce identical output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DebtTerms, DocumentExtraction};

/// Days per year used for lease-term arithmetic
const DAYS_PER_YEAR: f64 = 365.25;

/// Normalized financial summary of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappedSummary {
    /// Net operating income; derived as `egi - opex` when not supplied
    pub noi: Option<f64>,
    /// Debt-service-coverage ratio; derived as `noi / annual_debt_service`
    /// (2 decimals) when not supplied
    pub dscr: Option<f64>,
    /// Weighted-average lease term remaining, in years (2 decimals)
    pub walt_years: Option<f64>,
    /// Debt terms, passed through from the extraction unchanged
    pub debt: DebtTerms,
}

/// Map a raw extraction into a normalized summary
///
/// `as_of` is the reference date for remaining lease terms.
pub fn map_extraction(extraction: &DocumentExtraction, as_of: NaiveDate) -> MappedSummary {
    let totals = &extraction.totals;

    let noi = totals.net_operating_income.or_else(|| {
        match (totals.effective_gross_income, totals.operating_expenses) {
            (Some(egi), Some(opex)) => Some(egi - opex),
            _ => None,
        }
    });

    let dscr = totals.dscr.or_else(|| match (noi, totals.annual_debt_service) {
        (Some(noi), Some(ads)) if ads != 0.0 => Some(round2(noi / ads)),
        _ => None,
    });

    MappedSummary {
        noi,
        dscr,
        walt_years: walt_years(extraction, as_of),
        debt: extraction.debt_terms.clone(),
    }
}

/// Rent-weighted average remaining lease term in years
///
/// Entries without a lease end or a positive base rent are excluded from
/// both the numerator and the denominator. `None` when no entry
/// qualifies.
fn walt_years(extraction: &DocumentExtraction, as_of: NaiveDate) -> Option<f64> {
    let mut weighted_years = 0.0;
    let mut total_rent = 0.0;

    for entry in &extraction.rent_roll {
        let (Some(end), Some(rent)) = (entry.lease_end, entry.base_rent) else {
            continue;
        };
        if rent <= 0.0 {
            continue;
        }
        let days_remaining = end.signed_duration_since(as_of).num_days() as f64;
        let years_remaining = (days_remaining / DAYS_PER_YEAR).max(0.0);
        weighted_years += years_remaining * rent;
        total_rent += rent;
    }

    if total_rent > 0.0 {
        Some(round2(weighted_years / total_rent))
    } else {
        None
    }
}

/// Round to 2 decimals, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
