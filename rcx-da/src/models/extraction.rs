//! Parsed financial document data
//!
//! One `DocumentExtraction` per uploaded source document. Created once by
//! the intake service when extraction succeeds and immutable afterwards;
//! corrections happen as a new reconciliation pass, never in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of source document the extraction was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Trailing-twelve-month operating statement
    TtmOperatingStatement,
    /// Standalone rent roll
    RentRoll,
    /// Loan / debt agreement
    DebtAgreement,
}

/// One monthly operating-statement line item (signed amount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Month in `YYYY-MM` form
    pub month: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub amount: f64,
}

/// Aggregate operating totals
///
/// All fields optional: the mapper derives NOI (`egi - opex`) and DSCR
/// (`noi / annual_debt_service`) when the document does not supply them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingTotals {
    pub gross_potential_rent: Option<f64>,
    pub effective_gross_income: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub net_operating_income: Option<f64>,
    pub annual_debt_service: Option<f64>,
    pub dscr: Option<f64>,
}

/// One lease record from the rent roll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRollEntry {
    pub unit: String,
    pub tenant: String,
    pub area_sqft: Option<f64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub base_rent: Option<f64>,
}

/// Extracted debt terms, passed through to the mapped summary unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtTerms {
    pub lender: Option<String>,
    pub principal: Option<f64>,
    /// "fixed" or "floating"
    pub rate_type: Option<String>,
    pub index: Option<String>,
    pub spread_bps: Option<f64>,
    pub all_in_rate: Option<f64>,
    pub amortization_months: Option<u32>,
    pub io_months: Option<u32>,
    pub maturity_date: Option<NaiveDate>,
    /// Rate cap description; absent or blank means uncapped
    pub rate_cap: Option<String>,
}

/// Loan covenant extracted from the debt agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Covenant {
    pub covenant_type: String,
    pub threshold: f64,
    pub frequency: String,
}

/// Extraction assumption with its source reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionNote {
    pub note: String,
    pub source: String,
}

/// Result of a single extraction validation check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub id: String,
    pub label: String,
    pub passed: bool,
}

/// Per-section extraction confidence, each in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub rent_roll: Option<f64>,
    pub ttm: Option<f64>,
}

/// Parsed financial data for one uploaded source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub doc_id: Uuid,
    pub document_type: DocumentType,
    /// Original upload file name
    pub source_file: String,
    /// sha256 of the uploaded bytes, for provenance
    pub source_hash: String,
    pub line_items: Vec<LineItem>,
    pub totals: OperatingTotals,
    pub rent_roll: Vec<RentRollEntry>,
    pub debt_terms: DebtTerms,
    pub covenants: Vec<Covenant>,
    pub assumptions: Vec<AssumptionNote>,
    pub validation_checks: Vec<ValidationCheck>,
    pub confidence: ConfidenceScores,
    pub extracted_at: DateTime<Utc>,
}
