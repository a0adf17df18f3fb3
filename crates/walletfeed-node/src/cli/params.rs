use clap::Parser;
use std::path::PathBuf;
use walletfeed_activity::{PeriodKind, TimestampUnit, UtxoSort};
use walletfeed_primitives::{AccountId, HistoryType};

/// Which activities to list.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum HistoryFilter {
    /// Every activity.
    #[default]
    All,
    /// Outgoing activities only.
    Send,
    /// Incoming activities only.
    Receive,
}

impl From<HistoryFilter> for HistoryType {
    fn from(filter: HistoryFilter) -> Self {
        match filter {
            HistoryFilter::All => Self::All,
            HistoryFilter::Send => Self::Send,
            HistoryFilter::Receive => Self::Receive,
        }
    }
}

/// Length of a daily totals period.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum Period {
    Hour,
    #[default]
    Day,
    /// Calendar week starting on Monday.
    Week,
}

impl From<Period> for PeriodKind {
    fn from(period: Period) -> Self {
        match period {
            Period::Hour => Self::Hour,
            Period::Day => Self::Day,
            Period::Week => Self::Week,
        }
    }
}

/// Unit of the timestamps reported by the remote ledger.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum Timestamps {
    Seconds,
    #[default]
    Millis,
}

impl From<Timestamps> for TimestampUnit {
    fn from(unit: Timestamps) -> Self {
        match unit {
            Timestamps::Seconds => Self::Seconds,
            Timestamps::Millis => Self::Millis,
        }
    }
}

/// Order of listed outputs.
#[derive(Clone, Copy, Default, Debug, clap::ValueEnum)]
pub enum UtxoOrder {
    /// Largest amount first.
    #[default]
    Amount,
    /// Highest id first.
    Id,
}

impl From<UtxoOrder> for UtxoSort {
    fn from(order: UtxoOrder) -> Self {
        match order {
            UtxoOrder::Amount => Self::Amount,
            UtxoOrder::Id => Self::Id,
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct CommonParams {
    /// Base URL of the remote wallet service.
    #[arg(
        long,
        global = true,
        value_name = "URL",
        env = "WALLETFEED_SERVER_URL",
        default_value = "http://127.0.0.1:9800"
    )]
    pub server_url: String,

    /// Local wallet account.
    #[arg(long, global = true, value_name = "ID", default_value_t = 0)]
    pub account_id: AccountId,

    /// SQLite file holding the transactions initiated by this wallet.
    ///
    /// Without it, activities are listed without local metadata.
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Sets a custom logging filter (syntax: `<target>=<level>`).
    ///
    /// Log levels (least to most verbose) are `error`, `warn`, `info`, `debug`, and `trace`.
    ///
    /// By default, all targets log `info`. The global log level can be set with `-l<level>`.
    ///
    /// Multiple `<target>=<level>` entries can be specified and separated by a comma.
    ///
    /// *Example*: `--log error,walletfeed_activity=debug`.
    /// Sets Global log level to `error` and the `walletfeed_activity` target to `debug`.
    #[arg(short = 'l', long, global = true, value_name = "LOG_PATTERN", value_delimiter = ',')]
    pub log: Vec<String>,
}
