//! Plan registry: merchant-side lifecycle (create, pause, resume, cancel).
//!
//! **PRs that only change plan behavior should edit this file only.**

use crate::events;
use crate::state_machine::validate_plan_transition;
use crate::types::{
    DataKey, Error, Plan, PlanStatus, MIN_INTERVAL, PERSISTENT_BUMP_LEDGERS,
};
use soroban_sdk::{Address, Env, String};

/// Allocate the next plan id. Ids start at 1 and never repeat; the stored
/// counter always equals the last allocated id.
pub fn next_plan_id(env: &Env) -> Result<u64, Error> {
    let count: u64 = env
        .storage()
        .instance()
        .get(&DataKey::PlanCount)
        .unwrap_or(0);
    let id = count.checked_add(1).ok_or(Error::Overflow)?;
    env.storage().instance().set(&DataKey::PlanCount, &id);
    Ok(id)
}

pub fn load_plan(env: &Env, plan_id: u64) -> Result<Plan, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Plan(plan_id))
        .ok_or(Error::PlanNotFound)
}

pub fn store_plan(env: &Env, plan_id: u64, plan: &Plan) {
    let key = DataKey::Plan(plan_id);
    env.storage().persistent().set(&key, plan);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

pub fn do_create_plan(
    env: &Env,
    merchant: Address,
    token: Address,
    amount: i128,
    interval: u64,
    name: String,
) -> Result<u64, Error> {
    merchant.require_auth();

    if amount <= 0 {
        return Err(Error::ZeroAmount);
    }
    if interval < MIN_INTERVAL {
        return Err(Error::IntervalTooShort);
    }

    let plan = Plan {
        merchant: merchant.clone(),
        token,
        amount,
        interval,
        name,
        status: PlanStatus::Active,
        subscriber_count: 0,
        created_at: env.ledger().timestamp(),
    };

    let plan_id = next_plan_id(env)?;
    store_plan(env, plan_id, &plan);
    events::plan_created(env, plan_id, &merchant, amount, interval);
    Ok(plan_id)
}

/// Shared ownership + transition path for pause/resume/cancel.
fn transition_plan(
    env: &Env,
    merchant: Address,
    plan_id: u64,
    to: PlanStatus,
) -> Result<(), Error> {
    merchant.require_auth();

    let mut plan = load_plan(env, plan_id)?;
    if merchant != plan.merchant {
        return Err(Error::Unauthorized);
    }
    validate_plan_transition(&plan.status, &to)?;
    plan.status = to;
    store_plan(env, plan_id, &plan);
    Ok(())
}

pub fn do_pause_plan(env: &Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
    transition_plan(env, merchant, plan_id, PlanStatus::Paused)?;
    events::plan_paused(env, plan_id);
    Ok(())
}

pub fn do_resume_plan(env: &Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
    transition_plan(env, merchant, plan_id, PlanStatus::Active)?;
    events::plan_resumed(env, plan_id);
    Ok(())
}

pub fn do_cancel_plan(env: &Env, merchant: Address, plan_id: u64) -> Result<(), Error> {
    transition_plan(env, merchant, plan_id, PlanStatus::Cancelled)?;
    events::plan_cancelled(env, plan_id);
    Ok(())
}
