//! Read-only views. Free storage reads, useful for off-chain indexers and UI.

use crate::plan::load_plan;
use crate::subscription::load_subscription;
use crate::types::{DataKey, Error, PaymentRecord, Plan, Subscription};
use soroban_sdk::{Address, Env, Vec};

pub fn get_plan(env: &Env, plan_id: u64) -> Result<Plan, Error> {
    load_plan(env, plan_id)
}

pub fn get_subscription(env: &Env, sub_id: u64) -> Result<Subscription, Error> {
    load_subscription(env, sub_id)
}

/// Number of plans ever created. `0` before any plan exists.
pub fn get_plan_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::PlanCount)
        .unwrap_or(0)
}

/// Number of subscriptions ever created. `0` before any subscription exists.
pub fn get_sub_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::SubCount)
        .unwrap_or(0)
}

/// Full charge history for a subscription, oldest first. Empty for unknown
/// ids and never-charged subscriptions alike.
pub fn get_payment_history(env: &Env, sub_id: u64) -> Vec<PaymentRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Payments(sub_id))
        .unwrap_or_else(|| Vec::new(env))
}

/// Subscription ids owned by `subscriber`, ascending, paginated by id scan.
///
/// Time complexity is O(total subscriptions); intended for off-chain callers,
/// not for other contracts.
pub fn get_user_subscriptions(
    env: &Env,
    subscriber: &Address,
    start_from_id: u64,
    limit: u32,
) -> Vec<u64> {
    let mut out = Vec::new(env);
    if limit == 0 {
        return out;
    }

    let last_id = get_sub_count(env);
    let mut id = start_from_id.max(1);
    while id <= last_id && out.len() < limit {
        if let Ok(sub) = load_subscription(env, id) {
            if &sub.subscriber == subscriber {
                out.push_back(id);
            }
        }
        id += 1;
    }
    out
}

/// Subscription ids held against `plan_id`, ascending, paginated by id scan.
/// Includes cancelled subscriptions; filter by status client-side if needed.
///
/// Same O(total subscriptions) scan as [`get_user_subscriptions`]; intended
/// for off-chain callers.
pub fn get_plan_subscribers(
    env: &Env,
    plan_id: u64,
    start_from_id: u64,
    limit: u32,
) -> Vec<u64> {
    let mut out = Vec::new(env);
    if limit == 0 {
        return out;
    }

    let last_id = get_sub_count(env);
    let mut id = start_from_id.max(1);
    while id <= last_id && out.len() < limit {
        if let Ok(sub) = load_subscription(env, id) {
            if sub.plan_id == plan_id {
                out.push_back(id);
            }
        }
        id += 1;
    }
    out
}
