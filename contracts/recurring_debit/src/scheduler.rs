//! Payment scheduler: due-date and spending-cap enforcement plus the actual
//! funds transfer. No auth — `execute_payment` is callable by anyone (keeper
//! or merchant); the preconditions alone decide whether a charge happens.
//!
//! **PRs that only change how one subscription is charged should edit this
//! file only.**

use crate::admin::get_fee_config;
use crate::events;
use crate::plan::load_plan;
use crate::subscription::{load_subscription, store_subscription};
use crate::types::{
    ChargeOutcome, DataKey, Error, PaymentRecord, PlanStatus, SubscriptionStatus, BPS_DENOM,
    PERSISTENT_BUMP_LEDGERS,
};
use soroban_sdk::{token, Env, Vec};

/// Charge one subscription for one billing interval.
///
/// Precondition chain, each a distinct failure: subscription exists, is
/// Active, its plan is Active, the payment is due, the plan amount fits the
/// cap, the subscriber can cover the amount, and the contract's allowance
/// covers it too. The cap is re-checked on every charge, not only at
/// subscribe time.
///
/// The transfer and the schedule advance happen inside one contract
/// invocation, so the ledger applies them atomically: a charge with no
/// schedule advance (or the reverse) is never observable.
pub fn charge_one(env: &Env, sub_id: u64, now: u64) -> Result<(), Error> {
    let mut sub = load_subscription(env, sub_id)?;

    if sub.status != SubscriptionStatus::Active {
        return Err(Error::InvalidStatus);
    }

    let plan = load_plan(env, sub.plan_id)?;
    if plan.status != PlanStatus::Active {
        return Err(Error::PlanInactive);
    }

    if now < sub.next_payment {
        return Err(Error::PaymentNotDue);
    }

    if plan.amount > sub.max_amount {
        return Err(Error::CapExceeded);
    }

    let fee_config = get_fee_config(env)?;
    let fee = plan
        .amount
        .checked_mul(fee_config.fee_bps as i128)
        .ok_or(Error::Overflow)?
        / BPS_DENOM;
    let net = plan.amount.checked_sub(fee).ok_or(Error::Overflow)?;

    let token_client = token::TokenClient::new(env, &plan.token);
    if token_client.balance(&sub.subscriber) < plan.amount {
        return Err(Error::InsufficientBalance);
    }

    // The contract spends the subscriber's pre-approved allowance. Both the
    // balance and the allowance are prechecked: a token sub-call that traps
    // would abort the whole invocation, including a surrounding batch, while
    // a precheck failure stays a classified per-subscription error.
    let spender = env.current_contract_address();
    if token_client.allowance(&sub.subscriber, &spender) < plan.amount {
        return Err(Error::InsufficientAllowance);
    }
    token_client.transfer_from(&spender, &sub.subscriber, &plan.merchant, &net);
    if fee > 0 {
        token_client.transfer_from(&spender, &sub.subscriber, &fee_config.fee_collector, &fee);
    }

    sub.last_payment = now;
    sub.next_payment = now.checked_add(plan.interval).ok_or(Error::Overflow)?;
    sub.payments_made = sub.payments_made.checked_add(1).ok_or(Error::Overflow)?;
    store_subscription(env, sub_id, &sub);

    append_payment_record(env, sub_id, plan.amount, now);
    events::payment_executed(env, sub_id, plan.amount, fee);
    Ok(())
}

fn append_payment_record(env: &Env, sub_id: u64, amount: i128, now: u64) {
    let key = DataKey::Payments(sub_id);
    let mut history: Vec<PaymentRecord> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| Vec::new(env));
    history.push_back(PaymentRecord {
        amount,
        timestamp: now,
        ledger_seq: env.ledger().sequence(),
    });
    env.storage().persistent().set(&key, &history);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}

pub fn do_execute_payment(env: &Env, sub_id: u64) -> Result<bool, Error> {
    charge_one(env, sub_id, env.ledger().timestamp())?;
    Ok(true)
}

/// Charge a batch of subscriptions. One failure never aborts the batch; the
/// caller gets a per-subscription outcome with the error code on failure.
pub fn do_execute_due_payments(env: &Env, sub_ids: &Vec<u64>) -> Vec<ChargeOutcome> {
    let now = env.ledger().timestamp();
    let mut outcomes = Vec::new(env);
    for id in sub_ids.iter() {
        let outcome = match charge_one(env, id, now) {
            Ok(()) => ChargeOutcome {
                subscription_id: id,
                success: true,
                error_code: 0,
            },
            Err(e) => ChargeOutcome {
                subscription_id: id,
                success: false,
                error_code: e.to_code(),
            },
        };
        outcomes.push_back(outcome);
    }
    outcomes
}
