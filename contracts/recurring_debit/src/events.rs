//! Event emission helpers. One function per observable state change so
//! entrypoints stay free of topic plumbing.

use soroban_sdk::{symbol_short, Address, Env};

pub fn initialized(env: &Env, admin: &Address, fee_bps: u32) {
    env.events().publish(
        (symbol_short!("protocol"), symbol_short!("init")),
        (admin.clone(), fee_bps),
    );
}

pub fn plan_created(env: &Env, plan_id: u64, merchant: &Address, amount: i128, interval: u64) {
    env.events().publish(
        (symbol_short!("plan"), symbol_short!("created")),
        (plan_id, merchant.clone(), amount, interval),
    );
}

pub fn plan_paused(env: &Env, plan_id: u64) {
    env.events()
        .publish((symbol_short!("plan"), symbol_short!("paused")), plan_id);
}

pub fn plan_resumed(env: &Env, plan_id: u64) {
    env.events()
        .publish((symbol_short!("plan"), symbol_short!("resumed")), plan_id);
}

pub fn plan_cancelled(env: &Env, plan_id: u64) {
    env.events()
        .publish((symbol_short!("plan"), symbol_short!("cancel")), plan_id);
}

pub fn subscribed(env: &Env, sub_id: u64, subscriber: &Address, plan_id: u64, max_amount: i128) {
    env.events().publish(
        (symbol_short!("sub"), symbol_short!("created")),
        (sub_id, subscriber.clone(), plan_id, max_amount),
    );
}

pub fn subscription_paused(env: &Env, sub_id: u64) {
    env.events()
        .publish((symbol_short!("sub"), symbol_short!("paused")), sub_id);
}

pub fn subscription_resumed(env: &Env, sub_id: u64) {
    env.events()
        .publish((symbol_short!("sub"), symbol_short!("resumed")), sub_id);
}

pub fn subscription_cancelled(env: &Env, sub_id: u64) {
    env.events()
        .publish((symbol_short!("sub"), symbol_short!("cancel")), sub_id);
}

pub fn payment_executed(env: &Env, sub_id: u64, amount: i128, fee: i128) {
    env.events().publish(
        (symbol_short!("payment"), symbol_short!("exec")),
        (sub_id, amount, fee),
    );
}
