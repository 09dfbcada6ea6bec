// Mock wallet - in-memory simulated wallet collaborator
//
// Stands in for a real signing wallet: deterministic identifiers from a
// seeded generator, configurable latency, and pending entries that confirm
// after a delay, mirroring how a live wallet would behave.

use super::{Wallet, WalletError};
use crate::sim::SimRng;
use crate::types::{
    Address, Balance, TransactionId, TransactionKind, TransactionStatus, WalletInfo,
    WalletTransaction, UNITS_PER_BNKR,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Base58 alphabet used for generated keys and addresses
const BASE58_CHARS: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Tuning for the mock wallet
#[derive(Debug, Clone)]
pub struct MockWalletConfig {
    /// Starting balance in base units
    pub initial_balance: Balance,

    /// Simulated network latency for a submit
    pub submit_latency: Duration,

    /// Delay before a pending transaction confirms
    pub confirm_delay: Duration,

    /// Seed for generated keys and signatures
    pub seed: u64,
}

impl Default for MockWalletConfig {
    fn default() -> Self {
        Self {
            initial_balance: 12 * UNITS_PER_BNKR + UNITS_PER_BNKR / 2,
            submit_latency: Duration::from_millis(300),
            confirm_delay: Duration::from_secs(3),
            seed: 0xB0B5,
        }
    }
}

/// Internal mutable state behind the mock
struct MockState {
    connected: bool,
    public_key: Option<String>,
    balance: Balance,
    /// History entries, newest first
    history: Vec<WalletTransaction>,
    rng: SimRng,
}

/// In-memory wallet implementation
pub struct MockWallet {
    config: MockWalletConfig,
    state: Arc<Mutex<MockState>>,
}

impl MockWallet {
    pub fn new(config: MockWalletConfig) -> Self {
        let rng = SimRng::seeded(config.seed);
        let state = MockState {
            connected: false,
            public_key: None,
            balance: config.initial_balance,
            history: Vec::new(),
            rng,
        };

        Self {
            config,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Fixed-length base58 token from the seeded generator
    fn base58_token(rng: &mut SimRng, len: usize) -> String {
        (0..len).map(|_| *rng.pick(BASE58_CHARS) as char).collect()
    }

    /// Seed the history with a couple of settled transactions, the way a
    /// freshly connected wallet reports its recent past
    fn seed_history(state: &mut MockState, own_address: Option<Address>) {
        let received = WalletTransaction {
            signature: TransactionId(Self::base58_token(&mut state.rng, 88)),
            kind: TransactionKind::Receive,
            amount: 5 * UNITS_PER_BNKR + UNITS_PER_BNKR / 5,
            status: TransactionStatus::Confirmed,
            timestamp: Utc::now(),
            from: None,
            to: own_address.clone(),
        };
        let sent = WalletTransaction {
            signature: TransactionId(Self::base58_token(&mut state.rng, 88)),
            kind: TransactionKind::Send,
            amount: UNITS_PER_BNKR + 8 * UNITS_PER_BNKR / 10,
            status: TransactionStatus::Confirmed,
            timestamp: Utc::now(),
            from: own_address,
            to: None,
        };

        state.history = vec![received, sent];
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn connect(&self) -> Result<WalletInfo, WalletError> {
        let mut state = self.state.lock().expect("wallet state poisoned");

        let public_key = match &state.public_key {
            Some(key) => key.clone(),
            None => {
                let key = Self::base58_token(&mut state.rng, 44);
                state.public_key = Some(key.clone());
                key
            }
        };

        if state.history.is_empty() {
            let own = Address::parse(&public_key).ok();
            Self::seed_history(&mut state, own);
        }

        state.connected = true;
        debug!("mock wallet connected: {}", public_key);

        Ok(WalletInfo {
            public_key,
            balance: state.balance,
        })
    }

    async fn disconnect(&self) {
        let mut state = self.state.lock().expect("wallet state poisoned");
        state.connected = false;
    }

    async fn submit_transfer(
        &self,
        recipient: &Address,
        amount: Balance,
    ) -> Result<TransactionId, WalletError> {
        let tx = {
            let mut state = self.state.lock().expect("wallet state poisoned");

            if !state.connected {
                return Err(WalletError::NotConnected);
            }
            if amount > state.balance {
                return Err(WalletError::InsufficientBalance {
                    need: amount,
                    have: state.balance,
                });
            }

            state.balance -= amount;

            let from = state
                .public_key
                .as_deref()
                .and_then(|k| Address::parse(k).ok());
            let tx = WalletTransaction {
                signature: TransactionId(Self::base58_token(&mut state.rng, 88)),
                kind: TransactionKind::Send,
                amount,
                status: TransactionStatus::Pending,
                timestamp: Utc::now(),
                from,
                to: Some(recipient.clone()),
            };
            state.history.insert(0, tx.clone());
            tx
        };

        // Simulated network round trip
        tokio::time::sleep(self.config.submit_latency).await;

        // Settlement happens later, off the caller's path
        let shared = Arc::clone(&self.state);
        let signature = tx.signature.clone();
        let confirm_delay = self.config.confirm_delay;
        tokio::spawn(async move {
            tokio::time::sleep(confirm_delay).await;
            let mut state = shared.lock().expect("wallet state poisoned");
            if let Some(entry) = state
                .history
                .iter_mut()
                .find(|t| t.signature == signature)
            {
                entry.status = TransactionStatus::Confirmed;
                debug!("mock wallet confirmed {}", signature.truncated());
            }
        });

        Ok(tx.signature)
    }

    async fn query_balance(&self) -> Result<Balance, WalletError> {
        let state = self.state.lock().expect("wallet state poisoned");
        if !state.connected {
            return Err(WalletError::NotConnected);
        }
        Ok(state.balance)
    }

    async fn query_history(&self) -> Result<Vec<WalletTransaction>, WalletError> {
        let state = self.state.lock().expect("wallet state poisoned");
        if !state.connected {
            return Err(WalletError::NotConnected);
        }
        Ok(state.history.clone())
    }
}

// =============================================================================
// TESTS
// =============================================================================
