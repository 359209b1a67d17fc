//! NEP-297 JSON decoder for delegation-onsocial events
//!
//! Format:
//! `EVENT_JSON:{"standard":"delegation","version":"1.0.0","event":"delegate_set",
//! "data":[{"custodian":..,"id":..,"delegate":..}]}`

use serde::Deserialize;
use std::fmt;

pub const EVENT_JSON_PREFIX: &str = "EVENT_JSON:";
pub const STANDARD: &str = "delegation";
pub const SUPPORTED_MAJOR_VERSION: &str = "1.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    DelegateSet,
    DelegateCleared,
    DelegatorSet,
    DelegatorCleared,
}

impl RecordKind {
    pub fn from_event(event: &str) -> Option<Self> {
        match event {
            "delegate_set" => Some(Self::DelegateSet),
            "delegate_cleared" => Some(Self::DelegateCleared),
            "delegator_set" => Some(Self::DelegatorSet),
            "delegator_cleared" => Some(Self::DelegatorCleared),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DelegateSet => "delegate_set",
            Self::DelegateCleared => "delegate_cleared",
            Self::DelegatorSet => "delegator_set",
            Self::DelegatorCleared => "delegator_cleared",
        }
    }

    pub fn relation(&self) -> Relation {
        match self {
            Self::DelegateSet | Self::DelegateCleared => Relation::Delegate,
            Self::DelegatorSet | Self::DelegatorCleared => Relation::Delegator,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::DelegateSet | Self::DelegatorSet)
    }
}

/// Which of the two registry relations a record touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Delegate,
    Delegator,
}

impl Relation {
    /// JSON field holding the counterparty account.
    pub fn field(&self) -> &'static str {
        match self {
            Relation::Delegate => "delegate",
            Relation::Delegator => "delegator",
        }
    }
}

/// One decoded change record: (custodian, id, counterparty) plus its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationRecord {
    pub kind: RecordKind,
    pub custodian: String,
    pub id: String,
    /// Delegate for delegate records, delegator for delegator records.
    pub counterparty: String,
}

impl DelegationRecord {
    pub fn new(kind: RecordKind, custodian: &str, id: &str, counterparty: &str) -> Self {
        Self {
            kind,
            custodian: custodian.to_string(),
            id: normalize_id(id),
            counterparty: counterparty.to_string(),
        }
    }

    pub fn key(&self) -> (&str, &str) {
        (&self.custodian, &self.id)
    }
}

#[derive(Deserialize)]
struct Nep297Event {
    #[serde(default)]
    standard: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    event: String,
    #[serde(default)]
    data: Vec<RecordData>,
}

#[derive(Deserialize)]
struct RecordData {
    custodian: Option<String>,
    id: Option<String>,
    delegate: Option<String>,
    delegator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Log line without the `EVENT_JSON:` prefix.
    NotAnEvent,
    Json(String),
    UnsupportedStandard(String),
    UnsupportedVersion(String),
    UnknownEvent(String),
    MissingField { event: String, field: &'static str },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotAnEvent => write!(f, "log line is not an event"),
            DecodeError::Json(e) => write!(f, "JSON decode error: {}", e),
            DecodeError::UnsupportedStandard(s) => write!(f, "unsupported event standard: {}", s),
            DecodeError::UnsupportedVersion(v) => write!(f, "unsupported event version: {}", v),
            DecodeError::UnknownEvent(e) => write!(f, "unknown event: {}", e),
            DecodeError::MissingField { event, field } => {
                write!(f, "event {} is missing field {}", event, field)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode one receipt log line.
pub fn decode_event_log(log: &str) -> Result<Vec<DelegationRecord>, DecodeError> {
    let json = log
        .strip_prefix(EVENT_JSON_PREFIX)
        .ok_or(DecodeError::NotAnEvent)?;
    decode_event_json(json)
}

/// Decode the JSON body of a NEP-297 event (prefix already stripped).
pub fn decode_event_json(json: &str) -> Result<Vec<DelegationRecord>, DecodeError> {
    let event: Nep297Event =
        serde_json::from_str(json).map_err(|e| DecodeError::Json(e.to_string()))?;

    if event.standard != STANDARD {
        return Err(DecodeError::UnsupportedStandard(event.standard));
    }
    if !event.version.starts_with(SUPPORTED_MAJOR_VERSION) {
        return Err(DecodeError::UnsupportedVersion(event.version));
    }
    let kind = RecordKind::from_event(&event.event)
        .ok_or_else(|| DecodeError::UnknownEvent(event.event.clone()))?;

    event
        .data
        .into_iter()
        .map(|data| {
            let missing = |field| DecodeError::MissingField {
                event: event.event.clone(),
                field,
            };
            let custodian = data.custodian.ok_or_else(|| missing("custodian"))?;
            let id = data.id.ok_or_else(|| missing("id"))?;
            let counterparty = match kind.relation() {
                Relation::Delegate => data.delegate,
                Relation::Delegator => data.delegator,
            }
            .ok_or_else(|| missing(kind.relation().field()))?;
            Ok(DelegationRecord::new(kind, &custodian, &id, &counterparty))
        })
        .collect()
}

/// Decode every delegation record from a sequence of logs, in order.
/// Plain log lines and events of other standards are skipped.
pub fn decode_logs<'a, I>(logs: I) -> Result<Vec<DelegationRecord>, DecodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    for log in logs {
        match decode_event_log(log) {
            Ok(decoded) => records.extend(decoded),
            Err(DecodeError::NotAnEvent) | Err(DecodeError::UnsupportedStandard(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(records)
}

fn normalize_id(id: &str) -> String {
    id.strip_prefix("0x").unwrap_or(id).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const ID: &str = "0707070707070707070707070707070707070707070707070707070707070707";

    fn event(standard: &str, version: &str, name: &str, data: Value) -> String {
        json!({
            "standard": standard,
            "version": version,
            "event": name,
            "data": data,
        })
        .to_string()
    }

    fn delegation_log(name: &str, data: Value) -> String {
        format!("{}{}", EVENT_JSON_PREFIX, event(STANDARD, "1.0.0", name, data))
    }

    #[test]
    fn test_decode_delegate_set() {
        let log = delegation_log(
            "delegate_set",
            json!([{ "custodian": "alice.near", "id": ID, "delegate": "bob.near" }]),
        );

        let records = decode_event_log(&log).unwrap();

        assert_eq!(
            records,
            vec![DelegationRecord::new(
                RecordKind::DelegateSet,
                "alice.near",
                ID,
                "bob.near"
            )]
        );
        assert_eq!(records[0].key(), ("alice.near", ID));
    }

    #[test]
    fn test_decode_delegator_cleared_normalizes_id() {
        let json = event(
            STANDARD,
            "1.2.0",
            "delegator_cleared",
            json!([{
                "custodian": "alice.near",
                "id": format!("0x{}", ID.to_uppercase()),
                "delegator": "carol.near",
            }]),
        );

        let records = decode_event_json(&json).unwrap();

        assert_eq!(records[0].kind, RecordKind::DelegatorCleared);
        assert_eq!(records[0].id, ID);
        assert_eq!(records[0].counterparty, "carol.near");
    }

    #[test]
    fn test_decode_rejects_foreign_and_malformed() {
        assert_eq!(
            decode_event_log("Delegator bob.near set delegate"),
            Err(DecodeError::NotAnEvent)
        );
        assert!(matches!(
            decode_event_json("not json"),
            Err(DecodeError::Json(_))
        ));
        assert_eq!(
            decode_event_json(&event("onsocial", "1.0.0", "delegate_set", json!([]))),
            Err(DecodeError::UnsupportedStandard("onsocial".into()))
        );
        assert_eq!(
            decode_event_json(&event(STANDARD, "2.0.0", "delegate_set", json!([]))),
            Err(DecodeError::UnsupportedVersion("2.0.0".into()))
        );
        assert_eq!(
            decode_event_json(&event(STANDARD, "1.0.0", "delegate_moved", json!([]))),
            Err(DecodeError::UnknownEvent("delegate_moved".into()))
        );
    }

    #[test]
    fn test_decode_missing_counterparty() {
        // A delegate record carrying a delegator field is malformed.
        let json = event(
            STANDARD,
            "1.0.0",
            "delegate_set",
            json!([{ "custodian": "alice.near", "id": "00", "delegator": "bob.near" }]),
        );
        assert_eq!(
            decode_event_json(&json),
            Err(DecodeError::MissingField {
                event: "delegate_set".into(),
                field: "delegate",
            })
        );
    }

    #[test]
    fn test_decode_logs_skips_noise() {
        let logs = [
            "Delegator bob.near set delegate for alice.near".to_string(),
            format!(
                "{}{}",
                EVENT_JSON_PREFIX,
                event("nep171", "1.0.0", "nft_mint", json!([]))
            ),
            delegation_log(
                "delegate_cleared",
                json!([{ "custodian": "alice.near", "id": ID, "delegate": "bob.near" }]),
            ),
            delegation_log(
                "delegate_set",
                json!([{ "custodian": "alice.near", "id": ID, "delegate": "carol.near" }]),
            ),
        ];

        let records = decode_logs(logs.iter().map(String::as_str)).unwrap();

        assert_eq!(
            records,
            vec![
                DelegationRecord::new(RecordKind::DelegateCleared, "alice.near", ID, "bob.near"),
                DelegationRecord::new(RecordKind::DelegateSet, "alice.near", ID, "carol.near"),
            ]
        );
    }

    #[test]
    fn test_decode_logs_propagates_corrupt_event() {
        let logs = ["EVENT_JSON:{broken"];
        assert!(matches!(decode_logs(logs), Err(DecodeError::Json(_))));
    }
}
