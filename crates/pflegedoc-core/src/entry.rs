//! Shared documentation-entry types for the optimization webhook and the entry store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input mode the caregiver used to capture the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Manual,
    Dictation,
}

/// Optimization intensity tier, forwarded opaquely to the remote optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    Standard,
    Extended,
    Maximum,
}

/// Lifecycle status of a stored entry.
///
/// `Draft` entries remain editable; `Final` freezes the optimized text.
/// The draft → final transition happens exactly once and is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Draft,
    Final,
}

/// A caregiver's free-text note as submitted for optimization.
///
/// Transient: built per submission from trimmed inputs, never persisted
/// directly. Serializes camelCase, matching the webhook request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationEntry {
    pub patient_name: String,
    pub mode: Mode,
    pub original_text: String,
    pub optimization_level: OptimizationLevel,
}

/// Assessed value before and after optimization, in CHF. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEstimate {
    pub value_before: f64,
    pub value_after: f64,
}

/// One key/value pair extracted by the optimizer.
///
/// Order carries no meaning but is preserved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub key: String,
    pub value: String,
}

/// The optimizer's response for one submission.
///
/// Owned by the editing session until saved; `optimized_text` is mutable
/// after receipt. CamelCase on the wire except the nested [`ValueEstimate`]
/// fields, which the webhook emits snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub original_text: String,
    pub optimized_text: String,
    pub value_estimate: ValueEstimate,
    pub mappings: Vec<Mapping>,
}

impl OptimizationResult {
    /// Value gained by the optimization, for display.
    pub fn value_increase(&self) -> f64 {
        self.value_estimate.value_after - self.value_estimate.value_before
    }
}

/// A persisted row of the `documentation_entries` table.
///
/// Column names are snake_case as stored. `updated_at` is bumped on every
/// mutation; `finalized_at` is set exactly once, when the entry goes final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub id: String,
    pub patient_name: String,
    pub mode: Mode,
    pub original_text: String,
    pub optimized_text: String,
    pub optimization_level: OptimizationLevel,
    pub value_before: f64,
    pub value_after: f64,
    pub mappings: Vec<Mapping>,
    pub status: EntryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    pub fn is_final(&self) -> bool {
        self.status == EntryStatus::Final
    }
}
