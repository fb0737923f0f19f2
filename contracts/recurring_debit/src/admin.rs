//! Protocol configuration: one-shot initialization and fee settings.
//!
//! **PRs that only change admin or config behavior should edit this file only.**

use crate::events;
use crate::types::{DataKey, Error, FeeConfig, MAX_FEE_BPS};
use soroban_sdk::{Address, Env};

pub fn do_initialize(
    env: &Env,
    admin: Address,
    fee_bps: u32,
    fee_collector: Address,
) -> Result<(), Error> {
    if env.storage().instance().has(&DataKey::Admin) {
        return Err(Error::AlreadyInitialized);
    }
    if fee_bps > MAX_FEE_BPS {
        return Err(Error::InvalidFee);
    }
    admin.require_auth();

    env.storage().instance().set(&DataKey::Admin, &admin);
    env.storage().instance().set(&DataKey::FeeBps, &fee_bps);
    env.storage()
        .instance()
        .set(&DataKey::FeeCollector, &fee_collector);
    env.storage().instance().set(&DataKey::PlanCount, &0u64);
    env.storage().instance().set(&DataKey::SubCount, &0u64);

    events::initialized(env, &admin, fee_bps);
    Ok(())
}

pub fn get_admin(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn get_fee_config(env: &Env) -> Result<FeeConfig, Error> {
    let fee_bps: u32 = env
        .storage()
        .instance()
        .get(&DataKey::FeeBps)
        .ok_or(Error::NotInitialized)?;
    let fee_collector: Address = env
        .storage()
        .instance()
        .get(&DataKey::FeeCollector)
        .ok_or(Error::NotInitialized)?;
    Ok(FeeConfig {
        fee_bps,
        fee_collector,
    })
}
