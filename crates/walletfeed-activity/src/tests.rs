use super::*;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use walletfeed_amount::{DecimalAmount, ExactArithmetic};
use walletfeed_primitives::{
    AccountId, Direction, FeedError, HistoryType, LocalHistoryStore, LocalTxMetadata,
    MergedActivity, OutputDescriptor, RawLedgerRecord, RemoteLedgerFeed, StoreError, UtxoItem,
};

pub(crate) fn record(
    height: u64,
    index: u64,
    amount: &str,
    txid: &str,
    timestamp: u64,
) -> RawLedgerRecord {
    RawLedgerRecord {
        height,
        index,
        amount: amount.to_string(),
        txid: Some(txid.to_string()),
        timestamp,
        release_date: None,
    }
}

pub(crate) fn local_tx(txid: &str, fee: &str, address: &str) -> LocalTxMetadata {
    LocalTxMetadata {
        txid: txid.to_string(),
        fee: fee.to_string(),
        priority_fee: "0.1".to_string(),
        address: address.to_string(),
        outputs: vec![OutputDescriptor {
            address: "recipient".to_string(),
            amount: "1".to_string(),
        }],
        batch_output: None,
    }
}

pub(crate) fn activity(height: u64, change_amount: &str, timestamp: u64) -> MergedActivity {
    MergedActivity {
        txid: None,
        fee: None,
        priority_fee: None,
        from: None,
        outputs: None,
        batch_output: None,
        message: String::new(),
        change_amount: change_amount.to_string(),
        timestamp,
        height,
        index: 0,
        release_date: None,
        utxos: Vec::new(),
    }
}

#[derive(Default)]
struct StaticFeed {
    records: Vec<RawLedgerRecord>,
    utxos: Vec<UtxoItem>,
    requested: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl RemoteLedgerFeed for StaticFeed {
    async fn fetch(&self, source: &str) -> std::result::Result<Vec<RawLedgerRecord>, FeedError> {
        self.requested.lock().push(source.to_string());
        Ok(self.records.clone())
    }

    async fn fetch_available_utxos(
        &self,
        source: &str,
    ) -> std::result::Result<Vec<UtxoItem>, FeedError> {
        self.requested.lock().push(source.to_string());
        Ok(self.utxos.clone())
    }
}

struct UnreachableFeed;

#[async_trait::async_trait]
impl RemoteLedgerFeed for UnreachableFeed {
    async fn fetch(&self, _source: &str) -> std::result::Result<Vec<RawLedgerRecord>, FeedError> {
        Err(FeedError::Transport("connection refused".into()))
    }

    async fn fetch_available_utxos(
        &self,
        _source: &str,
    ) -> std::result::Result<Vec<UtxoItem>, FeedError> {
        Err(FeedError::Transport("connection refused".into()))
    }
}

#[derive(Default)]
struct MemStore {
    entries: Vec<(AccountId, LocalTxMetadata)>,
}

#[async_trait::async_trait]
impl LocalHistoryStore for MemStore {
    async fn get(
        &self,
        account_id: AccountId,
    ) -> std::result::Result<Vec<LocalTxMetadata>, StoreError> {
        Ok(self
            .entries
            .iter()
            .filter(|(id, _)| *id == account_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

struct BrokenStore;

#[async_trait::async_trait]
impl LocalHistoryStore for BrokenStore {
    async fn get(
        &self,
        _account_id: AccountId,
    ) -> std::result::Result<Vec<LocalTxMetadata>, StoreError> {
        Err(StoreError::new("database is locked"))
    }
}

fn new_pipeline<Store: LocalHistoryStore>(
    store: Store,
) -> ActivityPipeline<StaticFeed, Store, ExactArithmetic> {
    ActivityPipeline::new(StaticFeed::default(), store, ExactArithmetic)
}

fn mixed_batch() -> Vec<RawLedgerRecord> {
    vec![
        record(100, 0, "50", "", 10),
        record(100, 1, "-20", "abc", 10),
        record(101, 0, "-7.5", "def", 30),
        record(102, 0, "3", "", 20),
        record(102, 1, "-3", "", 20),
        record(103, 0, "-1", "ghi", 30),
        record(104, 0, "0.000000000000000001", "", 5),
    ]
}

#[tokio::test]
async fn test_height_group_example() {
    let records = vec![record(100, 0, "50", "", 10), record(100, 1, "-20", "abc", 10)];

    let activity = new_pipeline(MemStore::default())
        .run(&records, 0, HistoryType::All)
        .await
        .unwrap();

    assert_eq!(activity.len(), 1);
    let merged = &activity[0];
    assert_eq!(merged.message, "Received 30");
    assert_eq!(merged.change_amount, "+ 30");
    assert_eq!(merged.height, 100);
    assert_eq!(merged.txid.as_deref(), Some("abc"));
    assert_eq!(
        merged
            .utxos
            .iter()
            .map(|u| (u.id, u.amount.as_str()))
            .collect::<Vec<_>>(),
        vec![(0, "50"), (1, "-20")]
    );
}

#[tokio::test]
async fn test_empty_batch_yields_empty_history() {
    let activity = new_pipeline(BrokenStore)
        .run(&[], 0, HistoryType::All)
        .await
        .unwrap();
    assert!(activity.is_empty());
}

#[tokio::test]
async fn test_store_failure_keeps_ledger_fields() {
    let records = vec![record(100, 0, "50", "", 10), record(100, 1, "-20", "abc", 10)];

    let activity = new_pipeline(BrokenStore)
        .run(&records, 0, HistoryType::All)
        .await
        .unwrap();

    let merged = &activity[0];
    assert_eq!(merged.message, "Received 30");
    assert_eq!(merged.change_amount, "+ 30");
    assert_eq!(merged.utxos.len(), 2);
    assert_eq!(merged.fee, None);
    assert_eq!(merged.from, None);
    assert_eq!(merged.outputs, None);
}

#[tokio::test]
async fn test_local_metadata_is_scoped_to_account() {
    let store = MemStore {
        entries: vec![
            (1, local_tx("def", "0.02", "mine")),
            (2, local_tx("ghi", "0.03", "other")),
        ],
    };
    let pipeline = new_pipeline(store);

    let activity = pipeline
        .run(&mixed_batch(), 1, HistoryType::All)
        .await
        .unwrap();

    let by_txid = |txid: &str| {
        activity
            .iter()
            .find(|a| a.txid.as_deref() == Some(txid))
            .unwrap()
    };
    assert_eq!(by_txid("def").fee.as_deref(), Some("0.02"));
    assert_eq!(by_txid("def").from.as_deref(), Some("mine"));
    assert_eq!(by_txid("ghi").fee, None);
}

#[tokio::test]
async fn test_fetch_failure_is_propagated() {
    let pipeline = ActivityPipeline::new(UnreachableFeed, MemStore::default(), ExactArithmetic);
    let query = ActivityQuery {
        server_url: "http://127.0.0.1:1".to_string(),
        account_id: 0,
        history_type: HistoryType::All,
    };

    assert!(matches!(
        pipeline.query(&query).await,
        Err(Error::Fetch(FeedError::Transport(_)))
    ));
}

#[tokio::test]
async fn test_query_passes_source_through() {
    let feed = Arc::new(StaticFeed {
        records: mixed_batch(),
        ..Default::default()
    });
    let pipeline = ActivityPipeline::new(feed.clone(), MemStore::default(), ExactArithmetic);
    let query = ActivityQuery {
        server_url: "http://wallet.local:9800".to_string(),
        account_id: 0,
        history_type: HistoryType::Send,
    };

    let activity = pipeline.query(&query).await.unwrap();

    assert_eq!(activity.len(), 2);
    assert!(activity.iter().all(|a| a.direction() == Direction::Send));
    assert_eq!(
        *feed.requested.lock(),
        vec!["http://wallet.local:9800".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_record_is_rejected() {
    let records = vec![record(1, 0, "5", "", 1), record(2, 3, "5,00", "", 2)];

    let err = new_pipeline(MemStore::default())
        .run(&records, 0, HistoryType::All)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedRecord {
            height: 2,
            index: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_one_activity_per_height() {
    let records = mixed_batch();
    let activity = new_pipeline(MemStore::default())
        .run(&records, 0, HistoryType::All)
        .await
        .unwrap();

    let heights = activity.iter().map(|a| a.height).collect::<Vec<_>>();
    let distinct = heights.iter().copied().collect::<HashSet<_>>();
    assert_eq!(heights.len(), distinct.len());
    assert_eq!(
        distinct,
        records.iter().map(|r| r.height).collect::<HashSet<_>>()
    );

    let utxo_count: usize = activity.iter().map(|a| a.utxos.len()).sum();
    assert_eq!(utxo_count, records.len());
}

#[tokio::test]
async fn test_direction_message_and_sign_agree() {
    let activity = new_pipeline(MemStore::default())
        .run(&mixed_batch(), 0, HistoryType::All)
        .await
        .unwrap();

    for merged in &activity {
        let summed: DecimalAmount = merged
            .utxos
            .iter()
            .map(|u| u.amount.parse::<DecimalAmount>().unwrap())
            .sum();
        let received = merged.message.starts_with("Received");
        assert_eq!(received, merged.change_amount.starts_with('+'));
        assert_eq!(received, !summed.is_negative());
        assert_eq!(merged.magnitude(), summed.abs().to_string());
    }

    let zero_sum = activity.iter().find(|a| a.height == 102).unwrap();
    assert_eq!(zero_sum.message, "Received 0");
    let tiny = activity.iter().find(|a| a.height == 104).unwrap();
    assert_eq!(tiny.change_amount, "+ 0.000000000000000001");
}

#[tokio::test]
async fn test_filters_partition_all() {
    let pipeline = new_pipeline(MemStore::default());
    let records = mixed_batch();

    let all = pipeline.run(&records, 0, HistoryType::All).await.unwrap();
    let send = pipeline.run(&records, 0, HistoryType::Send).await.unwrap();
    let receive = pipeline
        .run(&records, 0, HistoryType::Receive)
        .await
        .unwrap();

    fn heights(items: &[MergedActivity]) -> HashSet<u64> {
        items.iter().map(|a| a.height).collect()
    }
    assert!(heights(&send).is_disjoint(&heights(&receive)));
    assert_eq!(
        heights(&all),
        heights(&send)
            .union(&heights(&receive))
            .copied()
            .collect::<HashSet<_>>()
    );
    assert_eq!(all.len(), send.len() + receive.len());
    assert!(send.iter().all(|a| a.change_amount.starts_with('-')));
    assert!(receive.iter().all(|a| a.change_amount.starts_with('+')));
}

#[tokio::test]
async fn test_sorted_most_recent_first_and_stable() {
    let activity = new_pipeline(MemStore::default())
        .run(&mixed_batch(), 0, HistoryType::All)
        .await
        .unwrap();

    assert!(activity.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));

    // Heights 101 and 103 share a timestamp and keep their grouping order.
    let order = activity.iter().map(|a| a.height).collect::<Vec<_>>();
    assert_eq!(order, vec![101, 103, 102, 100, 104]);
}

#[tokio::test]
async fn test_running_twice_is_idempotent() {
    let store = MemStore {
        entries: vec![(0, local_tx("abc", "1", "me"))],
    };
    let pipeline = new_pipeline(store);
    let records = mixed_batch();

    let first = pipeline.run(&records, 0, HistoryType::All).await.unwrap();
    let second = pipeline.run(&records, 0, HistoryType::All).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_same_height_with_different_txids() {
    let records = vec![
        record(200, 0, "5", "tx-a", 1),
        record(200, 1, "-2", "tx-b", 1),
        record(200, 2, "1", "", 1),
    ];
    let store = MemStore {
        entries: vec![
            (0, local_tx("tx-a", "0.1", "a")),
            (0, local_tx("tx-b", "0.2", "b")),
        ],
    };

    let activity = new_pipeline(store)
        .run(&records, 0, HistoryType::All)
        .await
        .unwrap();

    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].txid.as_deref(), Some("tx-b"));
    assert_eq!(activity[0].fee.as_deref(), Some("0.2"));
    assert_eq!(activity[0].message, "Received 4");
}

#[tokio::test]
async fn test_available_utxos_through_pipeline() {
    let feed = StaticFeed {
        utxos: vec![
            UtxoItem {
                id: 1,
                amount: "2".to_string(),
                locked: false,
                release_date: None,
            },
            UtxoItem {
                id: 2,
                amount: "30".to_string(),
                locked: false,
                release_date: None,
            },
            UtxoItem {
                id: 3,
                amount: "100".to_string(),
                locked: true,
                release_date: Some(serde_json::json!(1_900_000_000_000u64)),
            },
        ],
        ..Default::default()
    };
    let pipeline = ActivityPipeline::new(feed, MemStore::default(), ExactArithmetic);

    let listed = pipeline
        .available_utxos("http://wallet.local", UtxoSort::Amount, false)
        .await
        .unwrap();

    assert_eq!(listed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 1]);
}

#[tokio::test]
async fn test_daily_view_of_pipeline_output() {
    let activity = new_pipeline(MemStore::default())
        .run(&mixed_batch(), 0, HistoryType::All)
        .await
        .unwrap();

    let policy = CalendarPeriod::new(PeriodKind::Day, TimestampUnit::Seconds);
    let buckets = aggregate_daily(&activity, &policy, &ExactArithmetic).unwrap();

    assert_eq!(buckets.len(), 1);
    let bucket = &buckets[0];
    assert_eq!(bucket.period_label, "1970-01-01");
    assert_eq!(bucket.received_total, "30.000000000000000001");
    assert_eq!(bucket.sent_total, "8.5");
    assert_eq!(
        (bucket.period_start_height, bucket.period_end_height),
        (100, 104)
    );
}
