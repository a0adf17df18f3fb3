use parking_lot::RwLock;
use std::collections::HashMap;
use walletfeed_primitives::{AccountId, LocalHistoryStore, LocalTxMetadata, StoreError};

/// Local history kept in memory, lost on exit.
#[derive(Debug, Default)]
pub struct InMemHistoryStore {
    entries: RwLock<HashMap<AccountId, Vec<LocalTxMetadata>>>,
}

impl InMemHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a transaction, replacing a previous entry with the same txid.
    pub fn record(&self, account_id: AccountId, metadata: LocalTxMetadata) {
        let mut entries = self.entries.write();
        let account = entries.entry(account_id).or_default();

        match account.iter_mut().find(|e| e.txid == metadata.txid) {
            Some(existing) => *existing = metadata,
            None => account.push(metadata),
        }
    }

    /// Removes a transaction, returns whether it was present.
    pub fn forget(&self, account_id: AccountId, txid: &str) -> bool {
        let mut entries = self.entries.write();
        let Some(account) = entries.get_mut(&account_id) else {
            return false;
        };

        let before = account.len();
        account.retain(|e| e.txid != txid);
        before != account.len()
    }
}

#[async_trait::async_trait]
impl LocalHistoryStore for InMemHistoryStore {
    async fn get(&self, account_id: AccountId) -> Result<Vec<LocalTxMetadata>, StoreError> {
        Ok(self
            .entries
            .read()
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }
}
