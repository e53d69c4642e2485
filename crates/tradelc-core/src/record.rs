//! # Ledger Records
//!
//! The two record types persisted by the ledger, plus the status enum that
//! the LC state machine drives.
//!
//! Both records are stored as JSON under their business key: the shipment
//! ID for a [`LetterOfCredit`], the username for a [`User`]. Field names
//! are fixed by existing callers and must not change.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

// ─── LC Status ───────────────────────────────────────────────────────

/// The `currentStatus` of a Letter of Credit.
///
/// Serialized as the bare status string. The empty string is the status of
/// records written before statuses existed; bootstrap back-fills it to
/// [`LcStatus::Created`]. Strings outside the known set are preserved in
/// [`LcStatus::Unrecognized`] so that foreign records survive a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LcStatus {
    /// No status recorded (legacy record).
    #[default]
    Unset,
    /// LC accepted by the ledger.
    Created,
    /// Exporter bank approved the LC.
    ExporterBankApproved,
    /// Exporter bank rejected the LC.
    ExporterBankRejected,
    /// Exporter shipping documents are on file.
    ExporterDocsUploaded,
    /// Customs cleared the shipment.
    CustomsApproved,
    /// Customs refused the shipment.
    CustomsRejected,
    /// Importer bank released payment.
    PaymentComplete,
    /// A status string this version does not know.
    Unrecognized(String),
}

impl LcStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Created => "Created",
            Self::ExporterBankApproved => "ExporterBankApproved",
            Self::ExporterBankRejected => "ExporterBankRejected",
            Self::ExporterDocsUploaded => "ExporterDocsUploaded",
            Self::CustomsApproved => "CustomsApproved",
            Self::CustomsRejected => "CustomsRejected",
            Self::PaymentComplete => "PaymentComplete",
            Self::Unrecognized(s) => s,
        }
    }

    /// Whether the status is empty and needs back-filling.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<String> for LcStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Self::Unset,
            "Created" => Self::Created,
            "ExporterBankApproved" => Self::ExporterBankApproved,
            "ExporterBankRejected" => Self::ExporterBankRejected,
            "ExporterDocsUploaded" => Self::ExporterDocsUploaded,
            "CustomsApproved" => Self::CustomsApproved,
            "CustomsRejected" => Self::CustomsRejected,
            "PaymentComplete" => Self::PaymentComplete,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<LcStatus> for String {
    fn from(status: LcStatus) -> Self {
        match status {
            LcStatus::Unrecognized(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LcStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Letter of Credit ────────────────────────────────────────────────

/// A Letter of Credit for one shipment.
///
/// Missing fields deserialize to their defaults, and a `null`
/// `documentNames` reads as an empty list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterOfCredit {
    pub shipment_id: String,
    #[serde(rename = "contentDesc")]
    pub content_description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub content_value: Decimal,
    pub exporter_company: String,
    pub exporter_bank: String,
    pub importer_company: String,
    pub importer_bank: String,
    pub freight_company: String,
    pub port_of_loading: String,
    pub port_of_entry: String,
    pub current_status: LcStatus,
    /// Uploaded document names, in upload order. Append-only.
    #[serde(deserialize_with = "null_as_empty")]
    pub document_names: Vec<String>,
    pub exporter_bank_approved: bool,
    pub exporter_docs_uploaded: bool,
    pub customs_approved: bool,
    pub payment_complete: bool,
}

impl LetterOfCredit {
    /// Decode a stored or submitted LC. Only a JSON object is accepted.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        from_json_object(bytes)
    }

    /// Encode for storage.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Reset the workflow fields to their freshly-created values.
    pub fn reset_workflow(&mut self) {
        self.current_status = LcStatus::Created;
        self.exporter_bank_approved = false;
        self.exporter_docs_uploaded = false;
        self.customs_approved = false;
        self.payment_complete = false;
    }

    /// Positional view of the uploaded documents.
    pub fn document_slots(&self) -> DocumentSlots {
        let slot = |i: usize| self.document_names.get(i).cloned();
        DocumentSlots {
            letter_of_credit: slot(0),
            bill_of_lading: slot(1),
            insurance: slot(2),
        }
    }
}

/// Decode `bytes` as `T`, requiring a JSON object at the top level.
///
/// Derived struct deserializers also accept arrays, filling fields by
/// position. Records are always objects; the `LCKeys` index is an array.
fn from_json_object<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    use serde::de::Error as _;
    use serde_json::Value;

    let found = match serde_json::from_slice::<Value>(bytes)? {
        value @ Value::Object(_) => return serde_json::from_value(value),
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
    };
    Err(serde_json::Error::custom(format!(
        "expected a JSON object, found {found}"
    )))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Documents interpreted by upload position: the LC itself first, then the
/// bill of lading, then the insurance certificate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSlots {
    pub letter_of_credit: Option<String>,
    pub bill_of_lading: Option<String>,
    pub insurance: Option<String>,
}

// ─── Users ───────────────────────────────────────────────────────────

/// A user account. Created once, never updated or deleted.
///
/// The password is stored as given. `Debug` redacts it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userName")]
    pub username: String,
    pub password: String,
    pub role: String,
}

impl User {
    /// Build a user record.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    /// Decode a stored user. Only a JSON object is accepted.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        from_json_object(bytes)
    }

    /// The record without its secret.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            role: self.role.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Public view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userName")]
    pub username: String,
    pub role: String,
}

// ─── Tests ───────────────────────────────────────────────────────────
