//! Client SDK for the recurring debit protocol.
//!
//! Drives contract invocations through an explicit build → simulate → sign →
//! submit → poll pipeline with observable per-attempt status. The ledger is
//! the single writer; this crate requests mutations and observes confirmed
//! results, never mutating protocol state locally.
//!
//! The two external collaborators, the wallet and the RPC node, enter as the
//! [`Signer`] and [`Ledger`] ports so the whole pipeline runs against
//! deterministic fakes in tests.

pub mod config;
pub mod error;
pub mod ops;
pub mod orchestrator;
pub mod ports;
pub mod tracker;

pub use config::ClientConfig;
pub use error::{translate, Result, SdkError};
pub use ops::ProtocolClient;
pub use orchestrator::Orchestrator;
pub use ports::{
    InvocationRequest, InvokeArg, Ledger, NetworkContext, PlanSnapshot, PlanStatus, PollStatus,
    RawLedgerError, ResourceEstimate, ReturnValue, SignedPayload, Signer, SignerError, Simulation,
    SubmissionHandle, SubscriptionSnapshot, SubscriptionStatus, UnsignedPayload,
};
pub use tracker::{TxPhase, TxTracker};
