//! Typed lifecycle operations over the pipeline.
//!
//! [`ProtocolClient`] owns an orchestrator and the acting address, and maps
//! each contract entrypoint to a method with domain-typed parameters and
//! return values. Write operations take the caller's [`TxTracker`] so the
//! caller can observe phase changes; reads go through the simulate-only
//! query path and need no tracker.

use crate::error::{Result, SdkError};
use crate::orchestrator::Orchestrator;
use crate::ports::{
    InvocationRequest, InvokeArg, Ledger, PlanSnapshot, ReturnValue, Signer, SubscriptionSnapshot,
};
use crate::tracker::TxTracker;

pub struct ProtocolClient<S, L> {
    orchestrator: Orchestrator<S, L>,
    /// The address invocations are made on behalf of. Merchant for plan
    /// management, subscriber for subscription lifecycle.
    actor: String,
}

impl<S: Signer, L: Ledger> ProtocolClient<S, L> {
    pub fn new(orchestrator: Orchestrator<S, L>, actor: impl Into<String>) -> Self {
        Self {
            orchestrator,
            actor: actor.into(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    fn request(&self, method: &'static str, args: Vec<InvokeArg>) -> InvocationRequest {
        InvocationRequest {
            contract_id: self.orchestrator.config().contract_id.clone(),
            method,
            args,
        }
    }

    // ── Protocol setup (actor = admin) ───────────────────────────────────

    /// One-shot protocol initialization: fee in basis points plus the
    /// address collecting it. A second call fails `AlreadyInitialized`.
    pub async fn initialize(
        &self,
        tracker: &mut TxTracker,
        fee_bps: u32,
        fee_collector: impl Into<String>,
    ) -> Result<()> {
        let request = self.request(
            "initialize",
            vec![
                InvokeArg::Address(self.actor.clone()),
                InvokeArg::U32(fee_bps),
                InvokeArg::Address(fee_collector.into()),
            ],
        );
        expect_void(self.orchestrator.invoke(request, tracker).await?)
    }

    // ── Plan lifecycle (actor = merchant) ────────────────────────────────

    /// Create a recurring charge template. Returns the new plan id.
    pub async fn create_plan(
        &self,
        tracker: &mut TxTracker,
        token: impl Into<String>,
        amount: i128,
        interval_secs: u64,
        name: impl Into<String>,
    ) -> Result<u64> {
        let request = self.request(
            "create_plan",
            vec![
                InvokeArg::Address(self.actor.clone()),
                InvokeArg::Address(token.into()),
                InvokeArg::I128(amount),
                InvokeArg::U64(interval_secs),
                InvokeArg::Text(name.into()),
            ],
        );
        expect_u64(self.orchestrator.invoke(request, tracker).await?)
    }

    pub async fn pause_plan(&self, tracker: &mut TxTracker, plan_id: u64) -> Result<()> {
        self.plan_transition("pause_plan", tracker, plan_id).await
    }

    pub async fn resume_plan(&self, tracker: &mut TxTracker, plan_id: u64) -> Result<()> {
        self.plan_transition("resume_plan", tracker, plan_id).await
    }

    pub async fn cancel_plan(&self, tracker: &mut TxTracker, plan_id: u64) -> Result<()> {
        self.plan_transition("cancel_plan", tracker, plan_id).await
    }

    async fn plan_transition(
        &self,
        method: &'static str,
        tracker: &mut TxTracker,
        plan_id: u64,
    ) -> Result<()> {
        let request = self.request(
            method,
            vec![
                InvokeArg::Address(self.actor.clone()),
                InvokeArg::U64(plan_id),
            ],
        );
        expect_void(self.orchestrator.invoke(request, tracker).await?)
    }

    // ── Subscription lifecycle (actor = subscriber) ──────────────────────

    /// Pre-authorize a capped recurring debit against a plan. Returns the
    /// new subscription id.
    pub async fn subscribe(
        &self,
        tracker: &mut TxTracker,
        plan_id: u64,
        max_amount: i128,
    ) -> Result<u64> {
        let request = self.request(
            "subscribe",
            vec![
                InvokeArg::Address(self.actor.clone()),
                InvokeArg::U64(plan_id),
                InvokeArg::I128(max_amount),
            ],
        );
        expect_u64(self.orchestrator.invoke(request, tracker).await?)
    }

    pub async fn cancel(&self, tracker: &mut TxTracker, subscription_id: u64) -> Result<()> {
        self.subscription_transition("cancel", tracker, subscription_id)
            .await
    }

    pub async fn pause(&self, tracker: &mut TxTracker, subscription_id: u64) -> Result<()> {
        self.subscription_transition("pause", tracker, subscription_id)
            .await
    }

    pub async fn resume(&self, tracker: &mut TxTracker, subscription_id: u64) -> Result<()> {
        self.subscription_transition("resume", tracker, subscription_id)
            .await
    }

    async fn subscription_transition(
        &self,
        method: &'static str,
        tracker: &mut TxTracker,
        subscription_id: u64,
    ) -> Result<()> {
        let request = self.request(
            method,
            vec![
                InvokeArg::Address(self.actor.clone()),
                InvokeArg::U64(subscription_id),
            ],
        );
        expect_void(self.orchestrator.invoke(request, tracker).await?)
    }

    // ── Payment execution ────────────────────────────────────────────────

    /// Execute one due payment. `true` means the charge moved money; every
    /// decline surfaces as a classified error instead.
    pub async fn execute_payment(
        &self,
        tracker: &mut TxTracker,
        subscription_id: u64,
    ) -> Result<bool> {
        let request = self.request("execute_payment", vec![InvokeArg::U64(subscription_id)]);
        expect_bool(self.orchestrator.invoke(request, tracker).await?)
    }

    // ── Reads (simulate-only, no signature) ──────────────────────────────

    pub async fn get_plan(&self, plan_id: u64) -> Result<PlanSnapshot> {
        let request = self.request("get_plan", vec![InvokeArg::U64(plan_id)]);
        match self.orchestrator.query(request).await? {
            ReturnValue::Plan(plan) => Ok(plan),
            other => Err(decode_mismatch("plan", &other)),
        }
    }

    pub async fn get_subscription(&self, subscription_id: u64) -> Result<SubscriptionSnapshot> {
        let request = self.request("get_subscription", vec![InvokeArg::U64(subscription_id)]);
        match self.orchestrator.query(request).await? {
            ReturnValue::Subscription(sub) => Ok(sub),
            other => Err(decode_mismatch("subscription", &other)),
        }
    }

    pub async fn get_plan_count(&self) -> Result<u64> {
        expect_u64(self.orchestrator.query(self.request("get_plan_count", vec![])).await?)
    }

    pub async fn get_sub_count(&self) -> Result<u64> {
        expect_u64(self.orchestrator.query(self.request("get_sub_count", vec![])).await?)
    }
}

fn decode_mismatch(expected: &'static str, got: &ReturnValue) -> SdkError {
    SdkError::Decode {
        expected,
        got: got.kind(),
    }
}

fn expect_u64(value: ReturnValue) -> Result<u64> {
    match value {
        ReturnValue::U64(n) => Ok(n),
        other => Err(decode_mismatch("u64", &other)),
    }
}

fn expect_bool(value: ReturnValue) -> Result<bool> {
    match value {
        ReturnValue::Bool(b) => Ok(b),
        other => Err(decode_mismatch("bool", &other)),
    }
}

fn expect_void(value: ReturnValue) -> Result<()> {
    match value {
        ReturnValue::Void => Ok(()),
        other => Err(decode_mismatch("void", &other)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::orchestrator::fakes::{FakeLedger, FakeSigner};
    use crate::ports::{PlanStatus, PollStatus, RawLedgerError};
    use crate::tracker::TxPhase;

    fn client(ledger: FakeLedger) -> ProtocolClient<FakeSigner, FakeLedger> {
        let config = ClientConfig {
            contract_id: "CCONTRACT".to_string(),
            ..ClientConfig::default()
        };
        let orchestrator = Orchestrator::new(Arc::new(FakeSigner::approving()), Arc::new(ledger), config);
        ProtocolClient::new(orchestrator, "GSUBSCRIBER")
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_decodes_the_new_id() {
        let client = client(FakeLedger::confirming(ReturnValue::U64(1)));
        let mut tracker = TxTracker::new();

        let id = client.subscribe(&mut tracker, 1, 500).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(tracker.phase(), TxPhase::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn execute_payment_surfaces_classified_declines() {
        let client = client(FakeLedger::failing_simulation(RawLedgerError::Contract(7)));
        let mut tracker = TxTracker::new();

        let err = client.execute_payment(&mut tracker, 1).await.unwrap_err();
        assert_eq!(err, SdkError::CapExceeded);
        assert_eq!(tracker.phase(), TxPhase::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn unexpected_return_shapes_are_decode_errors() {
        let client = client(FakeLedger::confirming(ReturnValue::Void));
        let mut tracker = TxTracker::new();

        let err = client.subscribe(&mut tracker, 1, 500).await.unwrap_err();
        assert_eq!(
            err,
            SdkError::Decode {
                expected: "u64",
                got: "void"
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_is_a_void_write() {
        let client = client(FakeLedger::confirming(ReturnValue::Void));
        let mut tracker = TxTracker::new();

        client
            .initialize(&mut tracker, 250, "GCOLLECTOR")
            .await
            .unwrap();
        assert_eq!(tracker.phase(), TxPhase::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_initialize_surfaces_typed() {
        let client = client(FakeLedger::failing_simulation(RawLedgerError::Contract(12)));
        let mut tracker = TxTracker::new();

        let err = client
            .initialize(&mut tracker, 250, "GCOLLECTOR")
            .await
            .unwrap_err();
        assert_eq!(err, SdkError::AlreadyInitialized);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_a_void_write() {
        let client = client(FakeLedger::confirming(ReturnValue::Void));
        let mut tracker = TxTracker::new();

        client.cancel(&mut tracker, 1).await.unwrap();
        assert_eq!(tracker.phase(), TxPhase::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn reads_decode_snapshots_without_a_tracker() {
        let plan = PlanSnapshot {
            id: 1,
            merchant: "GMERCHANT".to_string(),
            token: "CTOKEN".to_string(),
            amount: 200,
            interval: 3600,
            name: "premium".to_string(),
            status: PlanStatus::Active,
            subscriber_count: 3,
            created_at: 500,
        };
        let client = client(FakeLedger::simulating(ReturnValue::Plan(plan.clone())));

        assert_eq!(client.get_plan(1).await.unwrap(), plan);
    }

    #[tokio::test(start_paused = true)]
    async fn read_declines_translate_too() {
        let client = client(FakeLedger::failing_simulation(RawLedgerError::Message(
            "HostError: Error(Contract, #2)".to_string(),
        )));
        assert_eq!(client.get_plan(9).await.unwrap_err(), SdkError::PlanNotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn ledger_confirmed_failure_reaches_the_caller_typed() {
        let client = client(FakeLedger::with_polls(vec![PollStatus::Failed(
            RawLedgerError::Contract(6),
        )]));
        let mut tracker = TxTracker::new();

        let err = client.execute_payment(&mut tracker, 1).await.unwrap_err();
        assert_eq!(err, SdkError::PaymentNotDue);
        assert!(!err.is_retryable());
    }
}
