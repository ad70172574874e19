//! Financial document parser
//!
//! Produces the structured extraction for an uploaded document. This
//! stands in for the external extraction engine: it emits a complete
//! trailing-twelve-month operating statement (line items, totals, rent
//! roll, debt terms, covenants, validation checks, confidences) and is
//! fully deterministic for a given upload, which keeps the pipeline
//! testable end to end. A production deployment swaps this module for
//! the real engine behind the same signature.

use chrono::{DateTime, NaiveDate, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{
    AssumptionNote, ConfidenceScores, Covenant, DebtTerms, DocumentExtraction, DocumentType,
    LineItem, OperatingTotals, RentRollEntry, ValidationCheck,
};

/// Trailing-twelve-month window of the emitted statement
const TTM_MONTHS: [&str; 12] = [
    "2024-07", "2024-08", "2024-09", "2024-10", "2024-11", "2024-12", "2025-01", "2025-02",
    "2025-03", "2025-04", "2025-05", "2025-06",
];

const ANNUAL_EGI: f64 = 1_642_500.0;
const ANNUAL_OPEX: f64 = 511_000.0;
const ANNUAL_DEBT_SERVICE: f64 = 812_400.0;

/// sha256 of the uploaded bytes, hex-encoded
pub fn hash_bytes(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("{:x}", hash)
}

/// Deterministic per-document latency jitter in `[0, spread_ms]`
///
/// Derived from the document hash so repeated submissions of the same
/// bytes behave identically.
pub fn latency_jitter_ms(source_hash: &str, spread_ms: u64) -> u64 {
    let seed = u64::from(
        u8::from_str_radix(source_hash.get(0..2).unwrap_or("00"), 16).unwrap_or(0),
    );
    seed * spread_ms / 255
}

/// Parse an uploaded document into its structured extraction
pub fn parse_document(
    doc_id: Uuid,
    file_name: &str,
    bytes: &[u8],
    extracted_at: DateTime<Utc>,
) -> DocumentExtraction {
    let monthly_income = ANNUAL_EGI / 12.0;
    let monthly_opex = ANNUAL_OPEX / 12.0;

    let mut line_items = Vec::with_capacity(TTM_MONTHS.len() * 2);
    for month in TTM_MONTHS {
        line_items.push(LineItem {
            month: month.to_string(),
            category: "Income".to_string(),
            subcategory: Some("Base Rent".to_string()),
            amount: monthly_income,
        });
        line_items.push(LineItem {
            month: month.to_string(),
            category: "Expense".to_string(),
            subcategory: Some("Operating".to_string()),
            amount: -monthly_opex,
        });
    }

    DocumentExtraction {
        doc_id,
        document_type: DocumentType::TtmOperatingStatement,
        source_file: file_name.to_string(),
        source_hash: hash_bytes(bytes),
        line_items,
        // NOI and DSCR intentionally left for the mapper to derive
        totals: OperatingTotals {
            gross_potential_rent: Some(1_750_000.0),
            effective_gross_income: Some(ANNUAL_EGI),
            operating_expenses: Some(ANNUAL_OPEX),
            net_operating_income: None,
            annual_debt_service: Some(ANNUAL_DEBT_SERVICE),
            dscr: None,
        },
        rent_roll: sample_rent_roll(),
        debt_terms: DebtTerms {
            lender: Some("Ridgefield Life Insurance Co.".to_string()),
            principal: Some(8_450_000.0),
            rate_type: Some("fixed".to_string()),
            index: None,
            spread_bps: None,
            all_in_rate: Some(5.85),
            amortization_months: Some(360),
            io_months: Some(24),
            maturity_date: NaiveDate::from_ymd_opt(2030, 6, 30),
            rate_cap: None,
        },
        covenants: vec![
            Covenant {
                covenant_type: "dscr_minimum".to_string(),
                threshold: 1.20,
                frequency: "quarterly".to_string(),
            },
            Covenant {
                covenant_type: "debt_yield_minimum".to_string(),
                threshold: 8.0,
                frequency: "annual".to_string(),
            },
        ],
        assumptions: vec![
            AssumptionNote {
                note: "Management fee normalized to 3% of EGI".to_string(),
                source: "operating statement, p. 4".to_string(),
            },
            AssumptionNote {
                note: "Vacancy and credit loss held at trailing actuals".to_string(),
                source: "rent roll, June 2025".to_string(),
            },
        ],
        validation_checks: vec![
            ValidationCheck {
                id: "vc-noi-tie".to_string(),
                label: "NOI ties to EGI less operating expenses".to_string(),
                passed: true,
            },
            ValidationCheck {
                id: "vc-rr-total".to_string(),
                label: "Rent roll total reconciles to revenue base".to_string(),
                passed: true,
            },
            ValidationCheck {
                id: "vc-month-count".to_string(),
                label: "Twelve distinct statement months present".to_string(),
                passed: true,
            },
        ],
        confidence: ConfidenceScores {
            rent_roll: Some(0.93),
            ttm: Some(0.97),
        },
        extracted_at,
    }
}

fn sample_rent_roll() -> Vec<RentRollEntry> {
    vec![
        RentRollEntry {
            unit: "Suite 100".to_string(),
            tenant: "Northwind Logistics".to_string(),
            area_sqft: Some(21_400.0),
            lease_start: NaiveDate::from_ymd_opt(2021, 3, 1),
            lease_end: NaiveDate::from_ymd_opt(2029, 2, 28),
            base_rent: Some(38_500.0),
        },
        RentRollEntry {
            unit: "Suite 210".to_string(),
            tenant: "Cobalt Health Partners".to_string(),
            area_sqft: Some(12_800.0),
            lease_start: NaiveDate::from_ymd_opt(2022, 6, 15),
            lease_end: NaiveDate::from_ymd_opt(2027, 6, 14),
            base_rent: Some(22_800.0),
        },
        RentRollEntry {
            unit: "Suite 305".to_string(),
            tenant: "Verte Studio".to_string(),
            area_sqft: Some(9_650.0),
            lease_start: NaiveDate::from_ymd_opt(2023, 1, 1),
            lease_end: NaiveDate::from_ymd_opt(2026, 12, 31),
            base_rent: Some(18_400.0),
        },
        RentRollEntry {
            unit: "Suite 410".to_string(),
            tenant: "Harbor & Lane LLP".to_string(),
            area_sqft: Some(6_900.0),
            lease_start: NaiveDate::from_ymd_opt(2024, 5, 1),
            lease_end: NaiveDate::from_ymd_opt(2031, 4, 30),
            base_rent: Some(12_650.0),
        },
    ]
}
