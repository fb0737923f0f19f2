//! Configuration for the client pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::NetworkContext;

/// Configuration for the transaction pipeline.
///
/// The poll cadence and bound together give the confirmation window: with the
/// defaults (1 s × 30 attempts) an unconfirmed transaction surfaces as a
/// timeout after roughly 30 seconds. A timeout means the outcome is unknown,
/// not that the operation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// RPC endpoint the ledger port talks to.
    pub rpc_url: String,

    /// Network passphrase handed to the signer with every payload.
    pub network_passphrase: String,

    /// Contract the lifecycle operations are invoked against.
    pub contract_id: String,

    /// Interval between confirmation polls.
    pub poll_interval: Duration,

    /// Maximum number of confirmation polls per submission.
    pub poll_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://soroban-testnet.stellar.org".to_string(),
            network_passphrase: "Test SDF Network ; September 2015".to_string(),
            contract_id: String::new(),
            poll_interval: Duration::from_millis(1000),
            poll_attempts: 30,
        }
    }
}

impl ClientConfig {
    pub fn network(&self) -> NetworkContext {
        NetworkContext {
            passphrase: self.network_passphrase.clone(),
        }
    }
}
