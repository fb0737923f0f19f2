//! Capability ports for the two external collaborators: the signer (wallet)
//! and the ledger (RPC). Both are modeled as injected traits rather than
//! concrete dependencies, so the pipeline is testable with deterministic
//! fakes that simulate success, rejection and timeout without any network.
//!
//! The wire format is deliberately unspecified here; arguments and return
//! values are semantic scalars and the payload types are opaque carriers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One semantic argument of a contract invocation, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeArg {
    Address(String),
    I128(i128),
    U64(u64),
    U32(u32),
    Text(String),
}

/// An unsigned invocation of one contract method with its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub contract_id: String,
    pub method: &'static str,
    pub args: Vec<InvokeArg>,
}

/// Resource cost estimate produced by simulation, attached to the payload so
/// the signer presents an accurate fee to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceEstimate {
    pub instructions: u64,
    pub fee: i128,
}

/// Successful simulation: resource costs plus the would-be return value.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub resource_estimate: ResourceEstimate,
    pub return_value: ReturnValue,
}

/// Assembled transaction awaiting a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedPayload {
    pub request: InvocationRequest,
    pub resource_estimate: ResourceEstimate,
}

/// A signed transaction ready for submission. The signature bytes are opaque
/// to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedPayload {
    pub payload: UnsignedPayload,
    pub signature: Vec<u8>,
}

/// Handle identifying a submitted transaction (the transaction hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmissionHandle(pub String);

/// Network identity handed to the signer with every payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub passphrase: String,
}

/// Decoded return value of a confirmed (or simulated) invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnValue {
    Void,
    U64(u64),
    Bool(bool),
    Plan(PlanSnapshot),
    Subscription(SubscriptionSnapshot),
}

impl ReturnValue {
    /// Short label for decode-mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ReturnValue::Void => "void",
            ReturnValue::U64(_) => "u64",
            ReturnValue::Bool(_) => "bool",
            ReturnValue::Plan(_) => "plan",
            ReturnValue::Subscription(_) => "subscription",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Active,
    Paused,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
}

/// Read-model mirror of the on-chain plan entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub id: u64,
    pub merchant: String,
    pub token: String,
    pub amount: i128,
    pub interval: u64,
    pub name: String,
    pub status: PlanStatus,
    pub subscriber_count: u32,
    pub created_at: u64,
}

/// Read-model mirror of the on-chain subscription entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    pub id: u64,
    pub subscriber: String,
    pub plan_id: u64,
    pub max_amount: i128,
    pub status: SubscriptionStatus,
    pub last_payment: u64,
    pub next_payment: u64,
    pub payments_made: u32,
    pub created_at: u64,
}

/// Raw failure signal from the ledger, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLedgerError {
    /// Structured contract error code.
    Contract(u32),
    /// Free-text diagnostic (RPC message, host error, ...).
    Message(String),
}

/// Failure signal from the signer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("signer rejected the payload: {0}")]
    Rejected(String),
    #[error("signer timed out")]
    Timeout,
}

/// Confirmation status of a submitted transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus {
    /// Accepted, not yet in a closed ledger.
    Pending,
    /// Not yet visible to the queried node. Polling continues.
    NotFound,
    Success(ReturnValue),
    Failed(RawLedgerError),
}

/// The external wallet: turns an unsigned payload into a signed one, or
/// rejects it.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(
        &self,
        unsigned: &UnsignedPayload,
        network: &NetworkContext,
    ) -> Result<SignedPayload, SignerError>;
}

/// The authoritative execution environment. The ledger is the single writer:
/// this crate only requests mutations and observes confirmed results.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Estimate resource costs and surface precondition failures without
    /// executing anything.
    async fn simulate(&self, request: &InvocationRequest) -> Result<Simulation, RawLedgerError>;

    /// Hand a signed transaction to the network.
    async fn submit(&self, signed: &SignedPayload) -> Result<SubmissionHandle, RawLedgerError>;

    /// Query the confirmation status of a prior submission.
    async fn poll_status(&self, handle: &SubmissionHandle) -> PollStatus;
}
