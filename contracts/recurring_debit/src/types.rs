//! Contract types: errors, storage keys and entity data structures.
//!
//! Kept in a separate module to reduce merge conflicts when editing state machine
//! or contract entrypoints.

use soroban_sdk::{contracterror, contracttype, Address, String};

/// Shortest billing interval a plan may declare, in seconds (1 hour).
pub const MIN_INTERVAL: u64 = 3600;

/// Upper bound for the protocol fee, in basis points (10%).
pub const MAX_FEE_BPS: u32 = 1000;

/// Basis-point denominator used by the fee split.
pub const BPS_DENOM: i128 = 10_000;

/// Persistent storage TTL in ledgers (~30 days at 5 s/ledger), bumped on
/// every entity write so plan and subscription data never expire.
pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// Canonical storage key enum for all contract state.
///
/// ⚠️ Upgrade-sensitive: discriminant order is fixed. Never remove or reorder
/// variants — only append new ones.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Protocol admin address. Discriminant 0. ⚠️ Must stay at 0.
    Admin,
    /// Protocol fee in basis points. Discriminant 1.
    FeeBps,
    /// Address receiving the protocol fee. Discriminant 2.
    FeeCollector,
    /// Number of plans ever created (last allocated plan id). Discriminant 3.
    PlanCount,
    /// Number of subscriptions ever created (last allocated id). Discriminant 4.
    SubCount,
    /// Plan record keyed by its id. Discriminant 5.
    Plan(u64),
    /// Subscription record keyed by its id. Discriminant 6.
    Sub(u64),
    /// (subscriber, plan) → subscription id, for live-subscription uniqueness.
    /// Discriminant 7.
    SubIndex(Address, u64),
    /// Payment history for a subscription. Discriminant 8.
    Payments(u64),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Caller is not the owner of the entity it tried to mutate.
    Unauthorized = 1,
    PlanNotFound = 2,
    SubscriptionNotFound = 3,
    /// The entity's current status does not permit the requested transition.
    InvalidStatus = 4,
    /// Subscriber's token balance cannot cover the plan amount.
    InsufficientBalance = 5,
    /// Charge attempted before `next_payment`.
    PaymentNotDue = 6,
    /// Spending cap below the plan amount.
    CapExceeded = 7,
    /// Plan is not Active.
    PlanInactive = 8,
    /// A live (Active or Paused) subscription already exists for this pair.
    AlreadySubscribed = 9,
    /// Interval below [`MIN_INTERVAL`].
    IntervalTooShort = 10,
    /// The provided amount is zero or negative.
    ZeroAmount = 11,
    AlreadyInitialized = 12,
    /// Arithmetic overflow in computation (e.g. fee or schedule math).
    Overflow = 13,
    /// Fee above [`MAX_FEE_BPS`].
    InvalidFee = 14,
    /// `initialize` has not been called yet.
    NotInitialized = 15,
    /// The contract's allowance from the subscriber cannot cover the plan
    /// amount.
    InsufficientAllowance = 16,
}

impl Error {
    /// Returns the numeric code for this error (for batch result reporting).
    pub const fn to_code(self) -> u32 {
        self as u32
    }
}

/// Lifecycle state of a merchant plan.
///
/// Active ↔ Paused may toggle; either may move to the terminal `Cancelled`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlanStatus {
    Active = 0,
    Paused = 1,
    /// Terminal. Cancelled plans are retained for history, never erased.
    Cancelled = 2,
}

/// Lifecycle state of a subscription.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubscriptionStatus {
    Active = 0,
    Paused = 1,
    /// Terminal. Retained for history.
    Cancelled = 2,
    /// Reserved terminal state. No transition currently produces it; kept so
    /// stored data stays decodable once an expiry rule is introduced.
    Expired = 3,
}

/// A recurring charge template owned by a merchant.
///
/// ⚠️ Upgrade-sensitive: field order and types are serialised as XDR by Soroban.
/// Adding fields requires a migration; removing or retyping fields is always
/// a breaking change.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Plan {
    /// Merchant receiving payments. Only this address may mutate the plan.
    pub merchant: Address,
    /// Token contract the plan charges in.
    pub token: Address,
    /// Charge per billing interval, in the token's smallest unit. Always > 0.
    pub amount: i128,
    /// Billing interval in seconds. Always >= [`MIN_INTERVAL`].
    pub interval: u64,
    /// Human-readable label.
    pub name: String,
    /// Current lifecycle state — modified only through state-machine transitions.
    pub status: PlanStatus,
    /// Number of live (Active or Paused) subscriptions against this plan.
    pub subscriber_count: u32,
    /// Ledger timestamp at creation.
    pub created_at: u64,
}

/// A subscriber's pre-authorization against a plan, bounded by a spending cap.
///
/// ⚠️ Upgrade-sensitive: field order is serialised as XDR.
///
/// Status is owned by the subscriber; the payment fields (`last_payment`,
/// `next_payment`, `payments_made`) are owned by the scheduler.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Subscription {
    pub subscriber: Address,
    pub plan_id: u64,
    /// Per-charge spending cap, fixed at subscribe time. Never auto-raised.
    pub max_amount: i128,
    pub status: SubscriptionStatus,
    /// Ledger timestamp of the last successful charge.
    pub last_payment: u64,
    /// Earliest timestamp the next charge is permitted.
    /// Invariant after every successful charge: `last_payment + plan.interval`.
    pub next_payment: u64,
    /// Successful charges so far. Monotonically non-decreasing.
    pub payments_made: u32,
    pub created_at: u64,
}

/// Immutable audit record appended on each successful charge.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentRecord {
    /// Gross amount debited from the subscriber (fee included).
    pub amount: i128,
    /// Ledger timestamp of the charge.
    pub timestamp: u64,
    /// Ledger sequence of the transaction that executed the charge.
    pub ledger_seq: u32,
}

/// Result of charging one subscription in a batch.
/// Used by [`crate::RecurringDebit::execute_due_payments`].
#[contracttype]
#[derive(Clone, Debug)]
pub struct ChargeOutcome {
    pub subscription_id: u64,
    /// True if the charge succeeded.
    pub success: bool,
    /// If success is false, the error code (from [`Error::to_code`]); otherwise 0.
    pub error_code: u32,
}

/// Protocol-level fee configuration, set once at [`crate::RecurringDebit::initialize`].
#[contracttype]
#[derive(Clone, Debug)]
pub struct FeeConfig {
    pub fee_bps: u32,
    pub fee_collector: Address,
}
