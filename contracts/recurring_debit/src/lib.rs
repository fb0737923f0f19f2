#![no_std]

// ── Modules ──────────────────────────────────────────────────────────────────
mod admin;
mod events;
mod plan;
mod queries;
mod scheduler;
mod state_machine;
mod subscription;
pub mod types;

// ── Re-exports (used by tests and external consumers) ────────────────────────
pub use state_machine::{is_live, validate_plan_transition, validate_subscription_transition};
pub use types::*;

use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct RecurringDebit;

#[contractimpl]
impl RecurringDebit {
    // ── Admin / Config ───────────────────────────────────────────────────

    /// Initialize the protocol: set admin, fee and fee collector. One-shot;
    /// a second call fails with [`Error::AlreadyInitialized`].
    pub fn initialize(
        env: Env,
        admin: Address,
        fee_bps: u32,
        fee_collector: Address,
    ) -> Result<(), Error> {
        admin::do_initialize(&env, admin, fee_bps, fee_collector)
    }

    /// Get the current fee configuration.
    pub fn get_fee_config(env: Env) -> Result<FeeConfig, Error> {
        admin::get_fee_config(&env)
    }

    /// Get the protocol admin address.
    pub fn get_admin(env: Env) -> Result<Address, Error> {
        admin::get_admin(&env)
    }

    // ── Plan lifecycle (merchant) ────────────────────────────────────────

    /// Merchant creates a recurring charge template.
    ///
    /// # Errors
    ///
    /// | Error | Condition |
    /// |-------|-----------|
    /// | `ZeroAmount` | `amount <= 0` |
    /// | `IntervalTooShort` | `interval < MIN_INTERVAL` (3600 s) |
    pub fn create_plan(
        env: Env,
        merchant: Address,
        token: Address,
        amount: i128,
        interval: u64,
        name: String,
    ) -> Result<u64, Error> {
        plan::do_create_plan(&env, merchant, token, amount, interval, name)
    }

    /// Pause a plan (no charges against any of its subscriptions until
    /// resumed). Merchant only.
    pub fn pause_plan(env: Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
        plan::do_pause_plan(&env, merchant, plan_id)
    }

    /// Resume a paused plan to Active. Merchant only.
    pub fn resume_plan(env: Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
        plan::do_resume_plan(&env, merchant, plan_id)
    }

    /// Cancel a plan. Terminal; the record is retained for history.
    /// Merchant only.
    pub fn cancel_plan(env: Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
        plan::do_cancel_plan(&env, merchant, plan_id)
    }

    // ── Subscription lifecycle (subscriber) ──────────────────────────────

    /// Subscriber pre-authorizes a capped recurring debit against a plan.
    ///
    /// Preconditions, in order: plan exists (`PlanNotFound`), plan is Active
    /// (`PlanInactive`), `max_amount >= plan.amount` (`CapExceeded`), and no
    /// live subscription already exists for this (subscriber, plan) pair
    /// (`AlreadySubscribed`). A rejected subscribe never consumes an id.
    ///
    /// On success the first payment is due immediately
    /// (`last_payment == next_payment == now`).
    pub fn subscribe(
        env: Env,
        subscriber: Address,
        plan_id: u64,
        max_amount: i128,
    ) -> Result<u64, Error> {
        subscription::do_subscribe(&env, subscriber, plan_id, max_amount)
    }

    /// Cancel the subscription. Terminal — a second cancel fails with
    /// [`Error::InvalidStatus`]. Decrements the plan's subscriber count.
    pub fn cancel(env: Env, subscriber: Address, subscription_id: u64) -> Result<(), Error> {
        subscription::do_cancel(&env, subscriber, subscription_id)
    }

    /// Pause the subscription (no charges until resumed). Leaves the payment
    /// schedule untouched.
    pub fn pause(env: Env, subscriber: Address, subscription_id: u64) -> Result<(), Error> {
        subscription::do_pause(&env, subscriber, subscription_id)
    }

    /// Resume a paused subscription to Active.
    pub fn resume(env: Env, subscriber: Address, subscription_id: u64) -> Result<(), Error> {
        subscription::do_resume(&env, subscriber, subscription_id)
    }

    // ── Payment execution ────────────────────────────────────────────────

    /// Execute one due payment. Callable by anyone — keeper or merchant.
    ///
    /// # Preconditions
    ///
    /// Checked in order, each with its own error:
    ///
    /// | Error | Condition |
    /// |-------|-----------|
    /// | `SubscriptionNotFound` | Unknown subscription id |
    /// | `InvalidStatus` | Subscription is not Active |
    /// | `PlanInactive` | Plan is not Active |
    /// | `PaymentNotDue` | `now < next_payment` |
    /// | `CapExceeded` | `plan.amount > max_amount` (re-checked) |
    /// | `InsufficientBalance` | Subscriber balance below `plan.amount` |
    ///
    /// # Behavior
    ///
    /// On success, in one atomic invocation: the plan amount moves from the
    /// subscriber to the merchant (net of the protocol fee, which goes to the
    /// fee collector), `last_payment` becomes `now`, `next_payment` becomes
    /// `now + interval`, `payments_made` increments by exactly 1, and a
    /// [`PaymentRecord`] is appended to the history.
    ///
    /// Returns `true` on success. Every precondition failure is a classified
    /// error — this entrypoint never reports failure as a plain `false`,
    /// which would conflate "ran and declined" with "never ran".
    pub fn execute_payment(env: Env, subscription_id: u64) -> Result<bool, Error> {
        scheduler::do_execute_payment(&env, subscription_id)
    }

    /// Charge a batch of subscriptions in one transaction.
    ///
    /// Returns a per-subscription outcome vector so keepers can identify
    /// which charges succeeded and which failed (with error codes).
    pub fn execute_due_payments(env: Env, subscription_ids: Vec<u64>) -> Vec<ChargeOutcome> {
        scheduler::do_execute_due_payments(&env, &subscription_ids)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Read plan by id.
    pub fn get_plan(env: Env, plan_id: u64) -> Result<Plan, Error> {
        queries::get_plan(&env, plan_id)
    }

    /// Read subscription by id.
    pub fn get_subscription(env: Env, subscription_id: u64) -> Result<Subscription, Error> {
        queries::get_subscription(&env, subscription_id)
    }

    /// Total number of plans ever created.
    pub fn get_plan_count(env: Env) -> u64 {
        queries::get_plan_count(&env)
    }

    /// Total number of subscriptions ever created.
    pub fn get_sub_count(env: Env) -> u64 {
        queries::get_sub_count(&env)
    }

    /// Charge history for a subscription, oldest first.
    pub fn get_payment_history(env: Env, subscription_id: u64) -> Vec<PaymentRecord> {
        queries::get_payment_history(&env, subscription_id)
    }

    /// Subscription ids owned by a subscriber, ascending, paginated.
    pub fn get_user_subscriptions(
        env: Env,
        subscriber: Address,
        start_from_id: u64,
        limit: u32,
    ) -> Vec<u64> {
        queries::get_user_subscriptions(&env, &subscriber, start_from_id, limit)
    }

    /// Subscription ids held against a plan, ascending, paginated.
    pub fn get_plan_subscribers(
        env: Env,
        plan_id: u64,
        start_from_id: u64,
        limit: u32,
    ) -> Vec<u64> {
        queries::get_plan_subscribers(&env, plan_id, start_from_id, limit)
    }
}
