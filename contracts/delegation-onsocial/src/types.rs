use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::AccountId;
use near_sdk_macros::NearSchema;
use std::fmt;
use std::str::FromStr;

pub const ID_LEN: usize = 32;

/// Opaque 32-byte identifier a delegation is scoped to.
///
/// Stored as raw bytes; travels over JSON as lowercase hex (a `0x` prefix
/// and uppercase digits are accepted on input).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
    NearSchema,
)]
#[borsh(crate = "near_sdk::borsh")]
#[serde(crate = "near_sdk::serde", try_from = "String", into = "String")]
#[abi(json, borsh)]
pub struct DelegationId(#[schemars(with = "String")] pub [u8; ID_LEN]);

impl fmt::Display for DelegationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDelegationId(pub String);

impl fmt::Display for InvalidDelegationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid delegation id {:?}: expected {} hex characters",
            self.0,
            ID_LEN * 2
        )
    }
}

impl std::error::Error for InvalidDelegationId {}

impl FromStr for DelegationId {
    type Err = InvalidDelegationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| InvalidDelegationId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for DelegationId {
    type Error = InvalidDelegationId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DelegationId> for String {
    fn from(id: DelegationId) -> Self {
        id.to_string()
    }
}

/// Returns true for the all-zero implicit accounts (NEAR-implicit
/// `000…0` and Ethereum-implicit `0x000…0`), which encode "no account".
pub fn is_zero_account(account_id: &AccountId) -> bool {
    let id = account_id.as_str();
    let digits = match id.strip_prefix("0x") {
        Some(eth) if eth.len() == 40 => eth,
        None if id.len() == 64 => id,
        _ => return false,
    };
    digits.bytes().all(|b| b == b'0')
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, NearSchema)]
#[serde(crate = "near_sdk::serde")]
#[abi(json)]
pub struct ContractInfo {
    pub version: String,
    pub standard: String,
    pub event_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_accepts_prefix_and_uppercase() {
        let lower = "ab".repeat(32);
        let id: DelegationId = lower.parse().unwrap();
        assert_eq!(id, DelegationId([0xab; 32]));
        assert_eq!(format!("0x{}", lower.to_uppercase()).parse::<DelegationId>(), Ok(id));
        assert_eq!(id.to_string(), lower);
    }

    #[test]
    fn test_id_parse_rejects_bad_input() {
        assert!("ab".repeat(31).parse::<DelegationId>().is_err());
        assert!("ab".repeat(33).parse::<DelegationId>().is_err());
        assert!("zz".repeat(32).parse::<DelegationId>().is_err());
        assert!("".parse::<DelegationId>().is_err());
    }

    #[test]
    fn test_id_json_is_hex_string() {
        let id = DelegationId([1; 32]);
        let json = near_sdk::serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: DelegationId = near_sdk::serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(near_sdk::serde_json::from_str::<DelegationId>("\"0102\"").is_err());
    }

    #[test]
    fn test_id_borsh_is_raw_bytes() {
        let id = DelegationId([7; ID_LEN]);
        let bytes = near_sdk::borsh::to_vec(&id).unwrap();
        assert_eq!(bytes, vec![7u8; ID_LEN]);
        assert_eq!(DelegationId::try_from_slice(&bytes).unwrap(), id);
    }

    #[test]
    fn test_zero_accounts() {
        let near_zero: AccountId = "0".repeat(64).parse().unwrap();
        let eth_zero: AccountId = format!("0x{}", "0".repeat(40)).parse().unwrap();
        assert!(is_zero_account(&near_zero));
        assert!(is_zero_account(&eth_zero));

        let not_zero: AccountId = format!("{}1", "0".repeat(63)).parse().unwrap();
        let short: AccountId = "00".parse().unwrap();
        let named: AccountId = "alice.near".parse().unwrap();
        assert!(!is_zero_account(&not_zero));
        assert!(!is_zero_account(&short));
        assert!(!is_zero_account(&named));
    }
}
