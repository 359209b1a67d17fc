use crate::decoder::DelegationRecord;

/// Selects the records relevant to one account and/or one id.
///
/// Every record carries custodian, id and counterparty, so a filtered stream
/// still replays cleanly: each (custodian, id) key either keeps all of its
/// records or keeps whole set/clear pairs for one counterparty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    account: Option<String>,
    id: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match records where `account` is the custodian, delegate or delegator.
    pub fn account(mut self, account: &str) -> Self {
        self.account = Some(account.to_string());
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.strip_prefix("0x").unwrap_or(id).to_ascii_lowercase());
        self
    }

    pub fn matches(&self, record: &DelegationRecord) -> bool {
        let account_ok = self
            .account
            .as_deref()
            .map_or(true, |a| record.custodian == a || record.counterparty == a);
        let id_ok = self.id.as_deref().map_or(true, |id| record.id == id);
        account_ok && id_ok
    }

    pub fn select<'a>(
        &'a self,
        records: &'a [DelegationRecord],
    ) -> impl Iterator<Item = &'a DelegationRecord> + 'a {
        records.iter().filter(move |record| self.matches(record))
    }
}
