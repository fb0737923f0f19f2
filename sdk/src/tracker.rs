//! Per-invocation transaction status tracking.
//!
//! One tracker belongs to exactly one invocation attempt. Holding the status
//! as a value owned by the caller (instead of process-wide state) prevents
//! status bleed between concurrent, unrelated invocations.

use tokio::sync::watch;

use crate::error::{Result, SdkError};
use crate::ports::SubmissionHandle;

/// Pipeline phase of one invocation attempt.
///
/// Legal transitions:
///
/// ```text
/// Idle ──────► Signing ──────► Submitting ──────► Success
///   │             │                 │
///   └────────────►└────────────────►└───────────► Error
///
/// Success | Error ──reset──► Idle
/// ```
///
/// Building and simulation happen while still `Idle`, so a failed simulation
/// moves straight to `Error` without ever reaching `Signing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    Signing,
    Submitting,
    Success,
    Error,
}

fn allowed(from: TxPhase, to: TxPhase) -> bool {
    use TxPhase::*;
    matches!(
        (from, to),
        (Idle, Signing)
            | (Idle, Error)
            | (Signing, Submitting)
            | (Signing, Error)
            | (Submitting, Success)
            | (Submitting, Error)
    )
}

/// Observable state machine for one invocation.
#[derive(Debug)]
pub struct TxTracker {
    phase: watch::Sender<TxPhase>,
    hash: Option<SubmissionHandle>,
}

impl TxTracker {
    pub fn new() -> Self {
        let (phase, _) = watch::channel(TxPhase::Idle);
        Self { phase, hash: None }
    }

    pub fn phase(&self) -> TxPhase {
        *self.phase.borrow()
    }

    /// Watch phase changes, e.g. to drive a progress indicator.
    pub fn subscribe(&self) -> watch::Receiver<TxPhase> {
        self.phase.subscribe()
    }

    /// Hash of the submitted transaction, once known. Survives into both
    /// terminal phases so an abandoned poll can still be re-queried.
    pub fn tx_hash(&self) -> Option<&SubmissionHandle> {
        self.hash.as_ref()
    }

    /// Prepare the tracker for a fresh attempt. Only legal from a terminal
    /// phase; a brand-new tracker is already `Idle`.
    pub fn reset(&mut self) -> Result<()> {
        let from = self.phase();
        if !matches!(from, TxPhase::Success | TxPhase::Error) {
            return Err(SdkError::PhaseViolation {
                from,
                to: TxPhase::Idle,
            });
        }
        self.hash = None;
        self.phase.send_replace(TxPhase::Idle);
        Ok(())
    }

    pub(crate) fn transition(&mut self, to: TxPhase) -> Result<()> {
        let from = self.phase();
        if !allowed(from, to) {
            return Err(SdkError::PhaseViolation { from, to });
        }
        self.phase.send_replace(to);
        Ok(())
    }

    pub(crate) fn set_tx_hash(&mut self, handle: SubmissionHandle) {
        self.hash = Some(handle);
    }
}

impl Default for TxTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut tracker = TxTracker::new();
        assert_eq!(tracker.phase(), TxPhase::Idle);
        tracker.transition(TxPhase::Signing).unwrap();
        tracker.transition(TxPhase::Submitting).unwrap();
        tracker.transition(TxPhase::Success).unwrap();
        assert_eq!(tracker.phase(), TxPhase::Success);
    }

    #[test]
    fn cannot_skip_signing() {
        let mut tracker = TxTracker::new();
        let err = tracker.transition(TxPhase::Submitting).unwrap_err();
        assert_eq!(
            err,
            SdkError::PhaseViolation {
                from: TxPhase::Idle,
                to: TxPhase::Submitting
            }
        );
    }

    #[test]
    fn cannot_go_backward_from_submitting() {
        let mut tracker = TxTracker::new();
        tracker.transition(TxPhase::Signing).unwrap();
        tracker.transition(TxPhase::Submitting).unwrap();
        assert!(tracker.transition(TxPhase::Signing).is_err());
    }

    #[test]
    fn simulation_failure_short_circuits_to_error() {
        let mut tracker = TxTracker::new();
        tracker.transition(TxPhase::Error).unwrap();
        assert_eq!(tracker.phase(), TxPhase::Error);
    }

    #[test]
    fn reset_only_from_terminal_phases() {
        let mut tracker = TxTracker::new();
        assert!(tracker.reset().is_err());

        tracker.transition(TxPhase::Signing).unwrap();
        assert!(tracker.reset().is_err());

        tracker.transition(TxPhase::Error).unwrap();
        tracker.reset().unwrap();
        assert_eq!(tracker.phase(), TxPhase::Idle);
        assert!(tracker.tx_hash().is_none());

        // A reset tracker can run a full attempt again.
        tracker.transition(TxPhase::Signing).unwrap();
        tracker.transition(TxPhase::Submitting).unwrap();
        tracker.transition(TxPhase::Success).unwrap();
        tracker.reset().unwrap();
    }

    #[test]
    fn observers_see_phase_changes() {
        let mut tracker = TxTracker::new();
        let rx = tracker.subscribe();
        tracker.transition(TxPhase::Signing).unwrap();
        assert_eq!(*rx.borrow(), TxPhase::Signing);
    }
}
