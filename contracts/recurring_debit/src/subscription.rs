//! Subscription registry: subscriber-side lifecycle (subscribe, pause,
//! resume, cancel).
//!
//! **PRs that only change subscription lifecycle should edit this file only.**

use crate::events;
use crate::plan::{load_plan, store_plan};
use crate::state_machine::{is_live, validate_subscription_transition};
use crate::types::{
    DataKey, Error, PlanStatus, Subscription, SubscriptionStatus, PERSISTENT_BUMP_LEDGERS,
};
use soroban_sdk::{Address, Env};

/// Allocate the next subscription id. Same contract as plan ids: starts at 1,
/// counter holds the last allocated id.
pub fn next_sub_id(env: &Env) -> Result<u64, Error> {
    let count: u64 = env
        .storage()
        .instance()
        .get(&DataKey::SubCount)
        .unwrap_or(0);
    let id = count.checked_add(1).ok_or(Error::Overflow)?;
    env.storage().instance().set(&DataKey::SubCount, &id);
    Ok(id)
}

pub fn load_subscription(env: &Env, sub_id: u64) -> Result<Subscription, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Sub(sub_id))
        .ok_or(Error::SubscriptionNotFound)
}

pub fn store_subscription(env: &Env, sub_id: u64, sub: &Subscription) {
    let key = DataKey::Sub(sub_id);
    env.storage().persistent().set(&key, sub);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

pub fn do_subscribe(
    env: &Env,
    subscriber: Address,
    plan_id: u64,
    max_amount: i128,
) -> Result<u64, Error> {
    subscriber.require_auth();

    // Precondition order is part of the contract: existence, plan status,
    // cap, then uniqueness. Nothing is written until all four pass, so a
    // rejected subscribe never consumes an id.
    let mut plan = load_plan(env, plan_id)?;
    if plan.status != PlanStatus::Active {
        return Err(Error::PlanInactive);
    }
    if max_amount < plan.amount {
        return Err(Error::CapExceeded);
    }

    let index_key = DataKey::SubIndex(subscriber.clone(), plan_id);
    if let Some(existing_id) = env.storage().persistent().get::<DataKey, u64>(&index_key) {
        let existing = load_subscription(env, existing_id)?;
        if is_live(&existing.status) {
            return Err(Error::AlreadySubscribed);
        }
    }

    let now = env.ledger().timestamp();
    let sub = Subscription {
        subscriber: subscriber.clone(),
        plan_id,
        max_amount,
        status: SubscriptionStatus::Active,
        // First charge is due immediately.
        last_payment: now,
        next_payment: now,
        payments_made: 0,
        created_at: now,
    };

    let sub_id = next_sub_id(env)?;
    store_subscription(env, sub_id, &sub);
    env.storage().persistent().set(&index_key, &sub_id);
    env.storage().persistent().extend_ttl(
        &index_key,
        PERSISTENT_BUMP_LEDGERS,
        PERSISTENT_BUMP_LEDGERS,
    );

    plan.subscriber_count = plan.subscriber_count.checked_add(1).ok_or(Error::Overflow)?;
    store_plan(env, plan_id, &plan);

    events::subscribed(env, sub_id, &subscriber, plan_id, max_amount);
    Ok(sub_id)
}

/// Shared ownership + transition path for pause/resume/cancel.
fn transition_subscription(
    env: &Env,
    subscriber: Address,
    sub_id: u64,
    to: SubscriptionStatus,
) -> Result<Subscription, Error> {
    subscriber.require_auth();

    let mut sub = load_subscription(env, sub_id)?;
    if subscriber != sub.subscriber {
        return Err(Error::Unauthorized);
    }
    validate_subscription_transition(&sub.status, &to)?;
    sub.status = to;
    store_subscription(env, sub_id, &sub);
    Ok(sub)
}

pub fn do_pause(env: &Env, subscriber: Address, sub_id: u64) -> Result<(), Error> {
    transition_subscription(env, subscriber, sub_id, SubscriptionStatus::Paused)?;
    events::subscription_paused(env, sub_id);
    Ok(())
}

pub fn do_resume(env: &Env, subscriber: Address, sub_id: u64) -> Result<(), Error> {
    transition_subscription(env, subscriber, sub_id, SubscriptionStatus::Active)?;
    events::subscription_resumed(env, sub_id);
    Ok(())
}

pub fn do_cancel(env: &Env, subscriber: Address, sub_id: u64) -> Result<(), Error> {
    let sub = transition_subscription(env, subscriber, sub_id, SubscriptionStatus::Cancelled)?;

    // The pair no longer counts as a live subscription.
    let mut plan = load_plan(env, sub.plan_id)?;
    plan.subscriber_count = plan.subscriber_count.saturating_sub(1);
    store_plan(env, sub.plan_id, &plan);

    events::subscription_cancelled(env, sub_id);
    Ok(())
}
