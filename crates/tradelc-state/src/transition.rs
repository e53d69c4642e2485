//! # Status Transitions
//!
//! Parses host-supplied `(field, value)` pairs and applies them to a
//! [`LetterOfCredit`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tradelc_core::{LcStatus, LedgerError, LetterOfCredit};

// ─── Status Field ────────────────────────────────────────────────────

/// The workflow flag a status update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusField {
    ExporterBankApproved,
    ExporterDocsUploaded,
    CustomsApproved,
    PaymentComplete,
}

impl StatusField {
    /// All fields, in workflow order.
    pub const ALL: [StatusField; 4] = [
        Self::ExporterBankApproved,
        Self::ExporterDocsUploaded,
        Self::CustomsApproved,
        Self::PaymentComplete,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExporterBankApproved => "ExporterBankApproved",
            Self::ExporterDocsUploaded => "ExporterDocsUploaded",
            Self::CustomsApproved => "CustomsApproved",
            Self::PaymentComplete => "PaymentComplete",
        }
    }

    /// Look up a field by its exact wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Status implied by setting this field to `value`.
    pub fn target_status(&self, value: bool) -> LcStatus {
        match (self, value) {
            (Self::ExporterBankApproved, true) => LcStatus::ExporterBankApproved,
            (Self::ExporterBankApproved, false) => LcStatus::ExporterBankRejected,
            (Self::ExporterDocsUploaded, _) => LcStatus::ExporterDocsUploaded,
            (Self::CustomsApproved, true) => LcStatus::CustomsApproved,
            (Self::CustomsApproved, false) => LcStatus::CustomsRejected,
            (Self::PaymentComplete, _) => LcStatus::PaymentComplete,
        }
    }

    /// Set the flag and status on `lc`. Returns the previous status.
    pub fn apply(&self, lc: &mut LetterOfCredit, value: bool) -> LcStatus {
        match self {
            Self::ExporterBankApproved => lc.exporter_bank_approved = value,
            Self::ExporterDocsUploaded => lc.exporter_docs_uploaded = value,
            Self::CustomsApproved => lc.customs_approved = value,
            Self::PaymentComplete => lc.payment_complete = value,
        }
        std::mem::replace(&mut lc.current_status, self.target_status(value))
    }
}

impl std::fmt::Display for StatusField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Policy ──────────────────────────────────────────────────────────

/// Handling of unknown field names and unparseable booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFieldPolicy {
    /// Reject the update with a validation error.
    #[default]
    Strict,
    /// Leave the record unchanged and report [`UpdateOutcome::Ignored`].
    Lenient,
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Rejected status updates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The field name is not one of [`StatusField::ALL`].
    #[error("unknown status field {0:?}")]
    UnknownField(String),

    /// The value is not a recognised boolean literal.
    #[error("invalid boolean {value:?} for status field {field}")]
    InvalidFlag {
        /// Field being updated.
        field: String,
        /// Raw value received.
        value: String,
    },
}

impl From<TransitionError> for LedgerError {
    fn from(err: TransitionError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}

// ─── Updates ─────────────────────────────────────────────────────────

/// Result of applying a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The flag was set and the status moved.
    Applied {
        field: StatusField,
        value: bool,
        from: LcStatus,
        to: LcStatus,
    },
    /// Input was malformed and the lenient policy left the record as-is.
    Ignored,
}

/// Parse a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Apply a host-supplied `(field, value)` update to `lc`.
pub fn apply_update(
    lc: &mut LetterOfCredit,
    field: &str,
    value: &str,
    policy: StatusFieldPolicy,
) -> Result<UpdateOutcome, TransitionError> {
    let parsed = match StatusField::parse(field) {
        Some(f) => f,
        None if policy == StatusFieldPolicy::Lenient => return Ok(UpdateOutcome::Ignored),
        None => return Err(TransitionError::UnknownField(field.to_string())),
    };
    let flag = match parse_flag(value) {
        Some(v) => v,
        None if policy == StatusFieldPolicy::Lenient => return Ok(UpdateOutcome::Ignored),
        None => {
            return Err(TransitionError::InvalidFlag {
                field: field.to_string(),
                value: value.to_string(),
            })
        }
    };
    let from = parsed.apply(lc, flag);
    Ok(UpdateOutcome::Applied {
        field: parsed,
        value: flag,
        from,
        to: lc.current_status.clone(),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────
