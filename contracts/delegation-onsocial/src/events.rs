use crate::types::DelegationId;
use near_sdk::serde_json::{json, Map, Value};
use near_sdk::{env, AccountId};

pub const EVENT_STANDARD: &str = "delegation";
pub const EVENT_VERSION: &str = "1.0.0";
pub const EVENT_JSON_PREFIX: &str = "EVENT_JSON:";

/// One state transition of the registry. Every variant carries the full
/// (custodian, id, counterparty) triple so observers can index on any of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegationEvent {
    DelegateSet {
        custodian: AccountId,
        id: DelegationId,
        delegate: AccountId,
    },
    DelegateCleared {
        custodian: AccountId,
        id: DelegationId,
        delegate: AccountId,
    },
    DelegatorSet {
        custodian: AccountId,
        id: DelegationId,
        delegator: AccountId,
    },
    DelegatorCleared {
        custodian: AccountId,
        id: DelegationId,
        delegator: AccountId,
    },
}

impl DelegationEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DelegationEvent::DelegateSet { .. } => "delegate_set",
            DelegationEvent::DelegateCleared { .. } => "delegate_cleared",
            DelegationEvent::DelegatorSet { .. } => "delegator_set",
            DelegationEvent::DelegatorCleared { .. } => "delegator_cleared",
        }
    }

    pub fn custodian(&self) -> &AccountId {
        match self {
            DelegationEvent::DelegateSet { custodian, .. }
            | DelegationEvent::DelegateCleared { custodian, .. }
            | DelegationEvent::DelegatorSet { custodian, .. }
            | DelegationEvent::DelegatorCleared { custodian, .. } => custodian,
        }
    }

    pub fn id(&self) -> &DelegationId {
        match self {
            DelegationEvent::DelegateSet { id, .. }
            | DelegationEvent::DelegateCleared { id, .. }
            | DelegationEvent::DelegatorSet { id, .. }
            | DelegationEvent::DelegatorCleared { id, .. } => id,
        }
    }

    /// The delegate or delegator the record is about, with its field name.
    pub fn counterparty(&self) -> (&'static str, &AccountId) {
        match self {
            DelegationEvent::DelegateSet { delegate, .. }
            | DelegationEvent::DelegateCleared { delegate, .. } => ("delegate", delegate),
            DelegationEvent::DelegatorSet { delegator, .. }
            | DelegationEvent::DelegatorCleared { delegator, .. } => ("delegator", delegator),
        }
    }

    pub fn to_json(&self) -> Value {
        let (field, account) = self.counterparty();
        let mut data = Map::new();
        data.insert("custodian".into(), json!(self.custodian()));
        data.insert("id".into(), json!(self.id()));
        data.insert(field.into(), json!(account));

        json!({
            "standard": EVENT_STANDARD,
            "version": EVENT_VERSION,
            "event": self.kind(),
            "data": [Value::Object(data)],
        })
    }

    pub fn to_log(&self) -> String {
        format!("{}{}", EVENT_JSON_PREFIX, self.to_json())
    }
}

/// Append-only destination for change records, supplied by the owner of the
/// state. Records are only handed over after every precondition has passed.
pub trait EventSink {
    fn record(&mut self, event: DelegationEvent);
}

/// Writes each record to the receipt logs as a NEP-297 event.
pub struct NearEventLog;

impl EventSink for NearEventLog {
    fn record(&mut self, event: DelegationEvent) {
        env::log_str(&event.to_log());
    }
}

impl EventSink for Vec<DelegationEvent> {
    fn record(&mut self, event: DelegationEvent) {
        self.push(event);
    }
}
