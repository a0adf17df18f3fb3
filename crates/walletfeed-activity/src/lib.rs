//! Wallet activity history.
//!
//! Reconciles the raw per-output records reported by a remote ledger with the metadata
//! of transactions this wallet initiated, producing a deduplicated, most-recent-first
//! activity feed:
//!
//! ```text
//! RemoteLedgerFeed -> group_by_height -> HistoryMerger (+ LocalHistoryStore) -> filter/sort
//!                                                                              -> aggregate_daily
//! ```

mod daily;
mod error;
mod height;
mod merger;
mod pipeline;
#[cfg(test)]
mod tests;
mod utxos;

pub use daily::{
    CalendarPeriod, ChartPoint, Period, PeriodKind, PeriodPolicy, RECEIVED_SERIES, SPENT_SERIES,
    TimestampUnit, aggregate_daily, chart_series,
};
pub use error::{Error, Result};
pub use height::{HeightGroup, group_by_height};
pub use merger::{HistoryMerger, LocalHistory};
pub use pipeline::{ActivityPipeline, ActivityQuery, build_activity, validate_records};
pub use utxos::{UtxoSort, list_available_utxos};
