//! The transaction pipeline: build → simulate → sign → submit → poll.
//!
//! Every lifecycle call goes through [`Orchestrator::invoke`]. The pipeline
//! never mutates registry state locally — it requests the mutation and
//! observes the confirmed result; the ledger is the single writer. No step
//! is retried automatically: on any error the caller must explicitly
//! re-invoke with a fresh attempt, which keeps "no silent double charge"
//! trivially true.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{self, Result, SdkError};
use crate::ports::{
    InvocationRequest, Ledger, PollStatus, RawLedgerError, ReturnValue, SignedPayload, Signer,
    UnsignedPayload,
};
use crate::tracker::{TxPhase, TxTracker};

/// Pipeline stage a raw ledger failure was observed at. Decides which
/// pipeline variant an unclassified failure collapses into.
#[derive(Debug, Clone, Copy)]
enum Stage {
    Simulate,
    Submit,
    Confirm,
}

fn translate_at(raw: &RawLedgerError, stage: Stage) -> SdkError {
    match (error::translate(raw), stage) {
        (SdkError::UnknownLedgerError(msg), Stage::Simulate) => SdkError::SimulationFailed(msg),
        (SdkError::UnknownLedgerError(msg), Stage::Submit) => SdkError::SubmissionFailed(msg),
        (err, _) => err,
    }
}

/// Drives lifecycle invocations through the signer and ledger ports.
///
/// Holds no cross-invocation mutable state; all per-attempt status lives in
/// the caller's [`TxTracker`].
pub struct Orchestrator<S, L> {
    signer: Arc<S>,
    ledger: Arc<L>,
    config: ClientConfig,
}

impl<S: Signer, L: Ledger> Orchestrator<S, L> {
    pub fn new(signer: Arc<S>, ledger: Arc<L>, config: ClientConfig) -> Self {
        Self {
            signer,
            ledger,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one full write attempt. The tracker must be `Idle`.
    ///
    /// Domain errors surfaced by simulation or confirmation come back as
    /// their contract variants; pipeline failures as the stage-specific
    /// variant. Either way the tracker lands in `Error` and can be `reset`
    /// for a fresh attempt.
    pub async fn invoke(
        &self,
        request: InvocationRequest,
        tracker: &mut TxTracker,
    ) -> Result<ReturnValue> {
        debug!(method = request.method, "simulating invocation");
        let simulation = match self.ledger.simulate(&request).await {
            Ok(simulation) => simulation,
            Err(raw) => {
                let err = translate_at(&raw, Stage::Simulate);
                warn!(method = request.method, %err, "simulation failed");
                tracker.transition(TxPhase::Error)?;
                return Err(err);
            }
        };

        tracker.transition(TxPhase::Signing)?;
        let unsigned = UnsignedPayload {
            request: request.clone(),
            resource_estimate: simulation.resource_estimate,
        };
        let signed: SignedPayload = match self.signer.sign(&unsigned, &self.config.network()).await
        {
            Ok(signed) => signed,
            Err(signer_err) => {
                let err = SdkError::from(signer_err);
                warn!(method = request.method, %err, "signing failed");
                tracker.transition(TxPhase::Error)?;
                return Err(err);
            }
        };

        tracker.transition(TxPhase::Submitting)?;
        let handle = match self.ledger.submit(&signed).await {
            Ok(handle) => handle,
            Err(raw) => {
                let err = translate_at(&raw, Stage::Submit);
                warn!(method = request.method, %err, "submission failed");
                tracker.transition(TxPhase::Error)?;
                return Err(err);
            }
        };
        tracker.set_tx_hash(handle.clone());
        debug!(method = request.method, tx = %handle.0, "submitted, polling for confirmation");

        for attempt in 1..=self.config.poll_attempts {
            tokio::time::sleep(self.config.poll_interval).await;
            match self.ledger.poll_status(&handle).await {
                PollStatus::Pending | PollStatus::NotFound => {
                    debug!(tx = %handle.0, attempt, "not yet confirmed");
                }
                PollStatus::Success(value) => {
                    tracker.transition(TxPhase::Success)?;
                    info!(method = request.method, tx = %handle.0, "confirmed");
                    return Ok(value);
                }
                PollStatus::Failed(raw) => {
                    let err = translate_at(&raw, Stage::Confirm);
                    warn!(tx = %handle.0, %err, "confirmed as failed");
                    tracker.transition(TxPhase::Error)?;
                    return Err(err);
                }
            }
        }

        // The outcome is unknown, not failed: the transaction may still land.
        // The caller must re-query authoritative state before retrying.
        warn!(tx = %handle.0, attempts = self.config.poll_attempts, "confirmation window closed");
        tracker.transition(TxPhase::Error)?;
        Err(SdkError::ConfirmationTimeout)
    }

    /// Read path: simulate only, no signature, no submission, no tracker.
    pub async fn query(&self, request: InvocationRequest) -> Result<ReturnValue> {
        debug!(method = request.method, "read-only query");
        match self.ledger.simulate(&request).await {
            Ok(simulation) => Ok(simulation.return_value),
            Err(raw) => Err(translate_at(&raw, Stage::Simulate)),
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Deterministic in-memory ports for pipeline tests.

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::ports::{
        InvocationRequest, Ledger, NetworkContext, PollStatus, RawLedgerError, ResourceEstimate,
        ReturnValue, SignedPayload, Signer, SignerError, Simulation, SubmissionHandle,
        UnsignedPayload,
    };

    pub struct FakeSigner {
        pub reject_with: Option<SignerError>,
        pub calls: AtomicU32,
    }

    impl FakeSigner {
        pub fn approving() -> Self {
            Self {
                reject_with: None,
                calls: AtomicU32::new(0),
            }
        }

        pub fn rejecting(err: SignerError) -> Self {
            Self {
                reject_with: Some(err),
                calls: AtomicU32::new(0),
            }
        }

        pub fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Signer for FakeSigner {
        async fn sign(
            &self,
            unsigned: &UnsignedPayload,
            _network: &NetworkContext,
        ) -> Result<SignedPayload, SignerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.reject_with {
                return Err(err.clone());
            }
            Ok(SignedPayload {
                payload: unsigned.clone(),
                signature: vec![0xAB; 64],
            })
        }
    }

    pub struct FakeLedger {
        pub simulate_result: Result<Simulation, RawLedgerError>,
        pub submit_result: Result<SubmissionHandle, RawLedgerError>,
        /// Scripted poll answers, consumed front to back; once exhausted
        /// every further poll answers `Pending`.
        pub polls: Mutex<VecDeque<PollStatus>>,
        pub poll_calls: AtomicU32,
    }

    impl FakeLedger {
        pub fn confirming(value: ReturnValue) -> Self {
            Self::with_polls(vec![
                PollStatus::NotFound,
                PollStatus::Pending,
                PollStatus::Success(value),
            ])
        }

        pub fn with_polls(polls: Vec<PollStatus>) -> Self {
            Self {
                simulate_result: Ok(Simulation {
                    resource_estimate: ResourceEstimate {
                        instructions: 1_000,
                        fee: 100,
                    },
                    return_value: ReturnValue::Void,
                }),
                submit_result: Ok(SubmissionHandle("deadbeef".to_string())),
                polls: Mutex::new(polls.into()),
                poll_calls: AtomicU32::new(0),
            }
        }

        pub fn failing_simulation(raw: RawLedgerError) -> Self {
            let mut ledger = Self::with_polls(vec![]);
            ledger.simulate_result = Err(raw);
            ledger
        }

        pub fn failing_submission(raw: RawLedgerError) -> Self {
            let mut ledger = Self::with_polls(vec![]);
            ledger.submit_result = Err(raw);
            ledger
        }

        pub fn simulating(value: ReturnValue) -> Self {
            let mut ledger = Self::with_polls(vec![]);
            ledger.simulate_result = Ok(Simulation {
                resource_estimate: ResourceEstimate::default(),
                return_value: value,
            });
            ledger
        }

        pub fn poll_count(&self) -> u32 {
            self.poll_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Ledger for FakeLedger {
        async fn simulate(
            &self,
            _request: &InvocationRequest,
        ) -> Result<Simulation, RawLedgerError> {
            self.simulate_result.clone()
        }

        async fn submit(&self, _signed: &SignedPayload) -> Result<SubmissionHandle, RawLedgerError> {
            self.submit_result.clone()
        }

        async fn poll_status(&self, _handle: &SubmissionHandle) -> PollStatus {
            self.poll_calls.fetch_add(1, Ordering::SeqCst);
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(PollStatus::Pending)
        }
    }
}
