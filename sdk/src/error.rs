//! Error taxonomy and the translator that maps raw ledger/signer failure
//! signals onto it.
//!
//! Domain errors carry the same stable numeric codes as the contract enum, so
//! a structured failure observed through simulation or confirmation decodes
//! to the identical variant the contract returned. Translation is total: it
//! never panics and always produces a value.

use thiserror::Error;

use crate::ports::{RawLedgerError, SignerError};
use crate::tracker::TxPhase;

pub type Result<T> = std::result::Result<T, SdkError>;

/// Longest raw diagnostic retained verbatim before truncation.
const MAX_RAW_ERROR_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SdkError {
    // ── Domain/state errors (terminal, never retried) ────────────────────
    #[error("not authorized to perform this action")]
    Unauthorized,
    #[error("plan not found")]
    PlanNotFound,
    #[error("subscription not found")]
    SubscriptionNotFound,
    #[error("invalid subscription status for this operation")]
    InvalidStatus,
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("payment is not due yet")]
    PaymentNotDue,
    #[error("amount exceeds spending cap")]
    CapExceeded,
    #[error("plan is inactive")]
    PlanInactive,
    #[error("already subscribed to this plan")]
    AlreadySubscribed,
    #[error("interval too short (min 1 hour)")]
    IntervalTooShort,
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("contract is already initialized")]
    AlreadyInitialized,

    // ── Pipeline errors (terminal per attempt, retryable by the caller) ──
    #[error("simulation failed: {0}")]
    SimulationFailed(String),
    #[error("transaction rejected by signer")]
    SignatureRejected,
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),
    /// The confirmation window closed without a terminal status. The
    /// operation's outcome is unknown, not failed; re-query authoritative
    /// state before retrying.
    #[error("timed out waiting for transaction confirmation")]
    ConfirmationTimeout,
    #[error("ledger error: {0}")]
    UnknownLedgerError(String),

    // ── Local programming errors ─────────────────────────────────────────
    #[error("unexpected return value: expected {expected}, got {got}")]
    Decode {
        expected: &'static str,
        got: &'static str,
    },
    #[error("invalid pipeline phase transition: {from:?} -> {to:?}")]
    PhaseViolation { from: TxPhase, to: TxPhase },
}

impl SdkError {
    /// The contract error code behind a domain variant, if any.
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            SdkError::Unauthorized => 1,
            SdkError::PlanNotFound => 2,
            SdkError::SubscriptionNotFound => 3,
            SdkError::InvalidStatus => 4,
            SdkError::InsufficientBalance => 5,
            SdkError::PaymentNotDue => 6,
            SdkError::CapExceeded => 7,
            SdkError::PlanInactive => 8,
            SdkError::AlreadySubscribed => 9,
            SdkError::IntervalTooShort => 10,
            SdkError::ZeroAmount => 11,
            SdkError::AlreadyInitialized => 12,
            _ => return None,
        };
        Some(code)
    }

    /// Fixed table mapping contract error codes to domain variants.
    pub fn from_code(code: u32) -> Option<SdkError> {
        let err = match code {
            1 => SdkError::Unauthorized,
            2 => SdkError::PlanNotFound,
            3 => SdkError::SubscriptionNotFound,
            4 => SdkError::InvalidStatus,
            5 => SdkError::InsufficientBalance,
            6 => SdkError::PaymentNotDue,
            7 => SdkError::CapExceeded,
            8 => SdkError::PlanInactive,
            9 => SdkError::AlreadySubscribed,
            10 => SdkError::IntervalTooShort,
            11 => SdkError::ZeroAmount,
            12 => SdkError::AlreadyInitialized,
            _ => return None,
        };
        Some(err)
    }

    /// Whether a fresh invocation may reasonably be attempted. Domain errors
    /// are final verdicts; pipeline errors describe a failed attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SdkError::SimulationFailed(_)
                | SdkError::SignatureRejected
                | SdkError::SubmissionFailed(_)
                | SdkError::ConfirmationTimeout
                | SdkError::UnknownLedgerError(_)
        )
    }
}

impl From<SignerError> for SdkError {
    fn from(err: SignerError) -> Self {
        match err {
            SignerError::Rejected(_) => SdkError::SignatureRejected,
            SignerError::Timeout => SdkError::ConfirmationTimeout,
        }
    }
}

/// Map a raw ledger failure onto the taxonomy.
///
/// Structured codes go through the fixed table; unknown codes are kept as
/// text. Free-text signals are classified by vocabulary: an embedded
/// `Error(Contract, #N)` marker decodes through the code table, rejection or
/// cancellation wording maps to [`SdkError::SignatureRejected`], timeout
/// wording to [`SdkError::ConfirmationTimeout`], and anything unrecognized is
/// retained verbatim (truncated) as [`SdkError::UnknownLedgerError`].
pub fn translate(raw: &RawLedgerError) -> SdkError {
    match raw {
        RawLedgerError::Contract(code) => SdkError::from_code(*code)
            .unwrap_or_else(|| SdkError::UnknownLedgerError(format!("contract error #{code}"))),
        RawLedgerError::Message(msg) => translate_message(msg),
    }
}

fn translate_message(msg: &str) -> SdkError {
    if let Some(code) = extract_contract_code(msg) {
        if let Some(err) = SdkError::from_code(code) {
            return err;
        }
        return SdkError::UnknownLedgerError(format!("contract error #{code}"));
    }

    let lower = msg.to_lowercase();
    if ["reject", "cancel", "denied", "user declined"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        return SdkError::SignatureRejected;
    }
    if lower.contains("timeout") || lower.contains("timed out") {
        return SdkError::ConfirmationTimeout;
    }

    SdkError::UnknownLedgerError(truncate(msg))
}

/// Pull `N` out of the host's `Error(Contract, #N)` diagnostic, if present.
fn extract_contract_code(msg: &str) -> Option<u32> {
    let marker = "Error(Contract, #";
    let start = msg.find(marker)? + marker.len();
    let digits: String = msg[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn truncate(msg: &str) -> String {
    if msg.len() > MAX_RAW_ERROR_LEN {
        let cut: String = msg.chars().take(MAX_RAW_ERROR_LEN).collect();
        format!("{cut}...")
    } else {
        msg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_codes_map_through_the_table() {
        assert_eq!(
            translate(&RawLedgerError::Contract(6)),
            SdkError::PaymentNotDue
        );
        assert_eq!(
            translate(&RawLedgerError::Contract(9)),
            SdkError::AlreadySubscribed
        );
        // Unknown codes are kept as text, not dropped.
        assert_eq!(
            translate(&RawLedgerError::Contract(999)),
            SdkError::UnknownLedgerError("contract error #999".to_string())
        );
    }

    #[test]
    fn embedded_contract_markers_decode() {
        let raw = RawLedgerError::Message(
            "HostError: Error(Contract, #7) while invoking execute_payment".to_string(),
        );
        assert_eq!(translate(&raw), SdkError::CapExceeded);
    }

    #[test]
    fn rejection_vocabulary_maps_to_signature_rejected() {
        for msg in ["User rejected the request", "signing cancelled", "access denied"] {
            assert_eq!(
                translate(&RawLedgerError::Message(msg.to_string())),
                SdkError::SignatureRejected,
                "{msg}"
            );
        }
    }

    #[test]
    fn timeout_vocabulary_maps_to_confirmation_timeout() {
        assert_eq!(
            translate(&RawLedgerError::Message("request timed out".to_string())),
            SdkError::ConfirmationTimeout
        );
    }

    #[test]
    fn unrecognized_text_is_retained_truncated() {
        let long = "x".repeat(300);
        match translate(&RawLedgerError::Message(long)) {
            SdkError::UnknownLedgerError(kept) => {
                assert_eq!(kept.len(), MAX_RAW_ERROR_LEN + 3);
                assert!(kept.ends_with("..."));
            }
            other => panic!("expected UnknownLedgerError, got {other:?}"),
        }

        let short = "boom".to_string();
        assert_eq!(
            translate(&RawLedgerError::Message(short)),
            SdkError::UnknownLedgerError("boom".to_string())
        );
    }

    #[test]
    fn code_table_round_trips() {
        for code in 1..=12 {
            let err = SdkError::from_code(code).expect("code in table");
            assert_eq!(err.code(), Some(code));
            assert!(!err.is_retryable());
        }
        assert_eq!(SdkError::from_code(0), None);
        assert!(SdkError::ConfirmationTimeout.is_retryable());
    }

    #[test]
    fn signer_failures_convert() {
        assert_eq!(
            SdkError::from(SignerError::Rejected("nope".to_string())),
            SdkError::SignatureRejected
        );
        assert_eq!(
            SdkError::from(SignerError::Timeout),
            SdkError::ConfirmationTimeout
        );
    }
}
