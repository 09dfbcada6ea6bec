// Wallet types - the shapes exchanged with the wallet collaborator

use super::primitives::Balance;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ADDRESS
// =============================================================================

/// Base58 alphabet accepted in addresses (no 0, O, I, l)
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Minimum / maximum address length
const ADDRESS_MIN_LEN: usize = 32;
const ADDRESS_MAX_LEN: usize = 44;

/// A validated recipient address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Validate and wrap an address string
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if raw.len() < ADDRESS_MIN_LEN || raw.len() > ADDRESS_MAX_LEN {
            return Err(AddressError::BadLength(raw.len()));
        }
        if let Some(c) = raw.chars().find(|c| !BASE58_ALPHABET.contains(*c)) {
            return Err(AddressError::BadCharacter(c));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for log lines ("4Nd7...kQ2p")
    pub fn truncated(&self) -> String {
        let s = &self.0;
        format!("{}...{}", &s[..4], &s[s.len() - 4..])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Address validation failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum AddressError {
    #[error("address length {0} outside 32-44 characters")]
    BadLength(usize),

    #[error("address contains invalid character '{0}'")]
    BadCharacter(char),
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Opaque transaction identifier returned by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    /// Shortened form for log lines
    pub fn truncated(&self) -> String {
        let s = &self.0;
        if s.len() <= 8 {
            s.clone()
        } else {
            format!("{}...", &s[..8])
        }
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction / kind of a wallet transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Send,
    Receive,
    Stake,
    Vote,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Send => write!(f, "SEND"),
            TransactionKind::Receive => write!(f, "RECEIVE"),
            TransactionKind::Stake => write!(f, "STAKE"),
            TransactionKind::Vote => write!(f, "VOTE"),
        }
    }
}

/// Settlement status as reported by the wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Confirmed => write!(f, "CONFIRMED"),
            TransactionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// A wallet transaction as it appears in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Signature assigned by the wallet
    pub signature: TransactionId,

    /// Kind of transaction
    pub kind: TransactionKind,

    /// Amount in base units
    pub amount: Balance,

    /// Settlement status
    pub status: TransactionStatus,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Sending address, if known
    pub from: Option<Address>,

    /// Receiving address, if known
    pub to: Option<Address>,
}

impl WalletTransaction {
    /// Size of the JSON-encoded transaction, used to derive RF payload size
    pub fn encoded_size(&self) -> usize {
        serde_json::to_vec(self).map(|v| v.len()).unwrap_or(0)
    }
}

/// Connection info returned by a successful wallet connect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInfo {
    /// Hex-encoded public key
    pub public_key: String,

    /// Spendable balance in base units
    pub balance: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_ADDRESS: &str = "4Nd1mYbSrxCbq4c9rFQpYvNyC2s7pXkQ2pGHhZ1kQ2pG";

    #[test]
    fn test_address_parse_valid() {
        let addr = Address::parse(GOOD_ADDRESS).unwrap();
        assert_eq!(addr.as_str(), GOOD_ADDRESS);
    }

    #[test]
    fn test_address_rejects_short() {
        let result = Address::parse("tooshort");
        assert!(matches!(result, Err(AddressError::BadLength(8))));
    }

    #[test]
    fn test_address_rejects_bad_characters() {
        // 0, O, I and l are excluded from the base58 alphabet
        let raw = "0OIl".repeat(9);
        assert!(matches!(
            Address::parse(&raw),
            Err(AddressError::BadCharacter('0'))
        ));
    }

    #[test]
    fn test_address_truncated() {
        let addr = Address::parse(GOOD_ADDRESS).unwrap();
        assert_eq!(addr.truncated(), "4Nd1...Q2pG");
    }

    #[test]
    fn test_transaction_id_truncated() {
        let id = TransactionId("abcdef1234567890".to_string());
        assert_eq!(id.truncated(), "abcdef12...");

        let short = TransactionId("abc".to_string());
        assert_eq!(short.truncated(), "abc");
    }

    #[test]
    fn test_encoded_size_nonzero() {
        let tx = WalletTransaction {
            signature: TransactionId("sig".to_string()),
            kind: TransactionKind::Send,
            amount: 1_000_000,
            status: TransactionStatus::Pending,
            timestamp: Utc::now(),
            from: None,
            to: Address::parse(GOOD_ADDRESS).ok(),
        };

        assert!(tx.encoded_size() > 0);
    }
}
