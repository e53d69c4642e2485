//! # tradelc-state — LC Status State Machine
//!
//! Every LC carries four workflow flags and a `currentStatus` string. A
//! status update names one flag and a boolean; the state machine sets the
//! flag and derives the new status from the pair:
//!
//! ```text
//! field                  true                    false
//! ExporterBankApproved   ExporterBankApproved    ExporterBankRejected
//! ExporterDocsUploaded   ExporterDocsUploaded    ExporterDocsUploaded
//! CustomsApproved        CustomsApproved         CustomsRejected
//! PaymentComplete        PaymentComplete         PaymentComplete
//! ```
//!
//! Transitions are not ordered: any field may be updated from any status.
//! The status always reflects the most recent successful update.
//!
//! Field names and booleans arrive as strings from the host. How malformed
//! input is handled is chosen by [`StatusFieldPolicy`].

pub mod transition;

pub use transition::{
    apply_update, parse_flag, StatusField, StatusFieldPolicy, TransitionError, UpdateOutcome,
};
