//! Data model shared by the activity pipeline and its collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a local wallet account.
pub type AccountId = u32;

/// One output touched at one block height, as reported by the remote ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLedgerRecord {
    /// Block height.
    pub height: u64,
    /// Output index.
    pub index: u64,
    /// Signed decimal amount.
    pub amount: String,
    /// Id of the transaction, may be empty or absent.
    #[serde(default)]
    pub txid: Option<String>,
    /// Block timestamp.
    pub timestamp: u64,
    /// Release date of a time-locked output, passed through untouched.
    #[serde(default)]
    pub release_date: Option<serde_json::Value>,
}

impl RawLedgerRecord {
    /// Returns the txid if it is present and non-empty.
    pub fn txid(&self) -> Option<&str> {
        self.txid.as_deref().filter(|txid| !txid.is_empty())
    }
}

/// Recipient of a locally initiated transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    /// Receiving address.
    pub address: String,
    /// Decimal amount sent to the address.
    pub amount: String,
}

/// Metadata of a transaction initiated by this wallet, known only locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTxMetadata {
    pub txid: String,
    pub fee: String,
    #[serde(rename = "priorityFee")]
    pub priority_fee: String,
    /// Address the transaction was sent from.
    pub address: String,
    #[serde(default)]
    pub outputs: Vec<OutputDescriptor>,
    #[serde(rename = "batchOutput", default)]
    pub batch_output: Option<serde_json::Value>,
}

/// One original per-output record nested under a merged activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoDetail {
    /// Output index of the original record.
    pub id: u64,
    /// Amount of the original record, verbatim.
    pub amount: String,
}

/// Direction of a merged activity, derived from the sign of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Receive,
    Send,
}

impl Direction {
    pub fn from_negative(is_negative: bool) -> Self {
        if is_negative { Self::Send } else { Self::Receive }
    }

    /// Human readable message, e.g. `Received 30`.
    pub fn message(&self, magnitude: &str) -> String {
        match self {
            Self::Receive => format!("Received {magnitude}"),
            Self::Send => format!("Sent {magnitude}"),
        }
    }

    /// Display-signed amount, e.g. `+ 30`.
    pub fn change_amount(&self, magnitude: &str) -> String {
        match self {
            Self::Receive => format!("+ {magnitude}"),
            Self::Send => format!("- {magnitude}"),
        }
    }
}

/// Display-ready record combining the ledger amount with optional local metadata.
///
/// Exactly one exists per distinct block height of a fetched batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    #[serde(
        rename = "priorityFee",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub priority_fee: Option<String>,
    /// Sender address of a locally initiated transaction.
    #[serde(rename = "form", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<OutputDescriptor>>,
    #[serde(
        rename = "batchOutput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub batch_output: Option<serde_json::Value>,
    pub message: String,
    #[serde(rename = "changeAmount")]
    pub change_amount: String,
    pub timestamp: u64,
    pub height: u64,
    pub index: u64,
    #[serde(default)]
    pub release_date: Option<serde_json::Value>,
    pub utxos: Vec<UtxoDetail>,
}

impl MergedActivity {
    /// Direction encoded in `change_amount`.
    pub fn direction(&self) -> Direction {
        Direction::from_negative(self.change_amount.starts_with('-'))
    }

    /// Absolute amount without the display sign.
    pub fn magnitude(&self) -> &str {
        self.change_amount
            .strip_prefix("+ ")
            .or_else(|| self.change_amount.strip_prefix("- "))
            .unwrap_or(&self.change_amount)
    }
}

/// Which activities to keep in the pipeline output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryType {
    #[default]
    All,
    Send,
    Receive,
}

impl HistoryType {
    /// Whether an activity of the given direction passes this filter.
    pub fn matches(&self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Send => direction == Direction::Send,
            Self::Receive => direction == Direction::Receive,
        }
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Send => write!(f, "Send"),
            Self::Receive => write!(f, "Receive"),
        }
    }
}

impl FromStr for HistoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "send" => Ok(Self::Send),
            "receive" => Ok(Self::Receive),
            other => Err(format!("Unknown history type: {other}")),
        }
    }
}

/// Per-period send/receive rollup of merged activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Lowest block height observed in the period.
    pub period_start_height: u64,
    /// Highest block height observed in the period.
    pub period_end_height: u64,
    pub period_label: String,
    /// Sum of received amounts.
    pub received_total: String,
    /// Sum of sent amounts, as a magnitude.
    pub sent_total: String,
}

impl DailyBucket {
    /// Single line summary of the bucket.
    pub fn summary_line(&self) -> String {
        format!(
            "Receive: {} Send: {} Height: ({} - {}) {}",
            self.received_total,
            self.sent_total,
            self.period_start_height,
            self.period_end_height,
            self.period_label
        )
    }
}

/// Spendable output as listed by the remote wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoItem {
    pub id: u64,
    pub amount: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub release_date: Option<serde_json::Value>,
}
