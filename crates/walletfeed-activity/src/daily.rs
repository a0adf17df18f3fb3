//! Per-period send/receive totals for charting.

use crate::error::Result;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use walletfeed_amount::DecimalAmount;
use walletfeed_primitives::{AmountArithmetic, DailyBucket, Direction, MergedActivity};

/// Name of the received series of a chart.
pub const RECEIVED_SERIES: &str = "Received";
/// Name of the sent series of a chart.
pub const SPENT_SERIES: &str = "Spent";

const SECS_PER_HOUR: i64 = 60 * 60;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Length of a bucketing period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Hour,
    #[default]
    Day,
    /// Calendar week starting on Monday.
    Week,
}

/// Unit of activity timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    Seconds,
    #[default]
    Millis,
}

/// A period an activity falls into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Sort key of the period; periods are ordered by it.
    pub start: i64,
    pub label: String,
}

/// Policy mapping activity timestamps to periods.
pub trait PeriodPolicy: Send + Sync {
    fn period_of(&self, timestamp: u64) -> Period;
}

/// Buckets timestamps by UTC calendar hour, day or week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarPeriod {
    pub kind: PeriodKind,
    pub unit: TimestampUnit,
}

impl CalendarPeriod {
    pub fn new(kind: PeriodKind, unit: TimestampUnit) -> Self {
        Self { kind, unit }
    }
}

impl PeriodPolicy for CalendarPeriod {
    fn period_of(&self, timestamp: u64) -> Period {
        let secs = match self.unit {
            TimestampUnit::Seconds => timestamp,
            TimestampUnit::Millis => timestamp / 1000,
        };
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);

        let (start, format) = match self.kind {
            PeriodKind::Hour => (secs - secs.rem_euclid(SECS_PER_HOUR), "%Y-%m-%d %H:00"),
            PeriodKind::Day => (secs - secs.rem_euclid(SECS_PER_DAY), "%Y-%m-%d"),
            PeriodKind::Week => {
                let days = secs.div_euclid(SECS_PER_DAY);
                // 1970-01-01 is a Thursday.
                let since_monday = (days + 3).rem_euclid(7);
                ((days - since_monday) * SECS_PER_DAY, "%Y-%m-%d")
            }
        };

        let label = DateTime::from_timestamp(start, 0)
            .map(|datetime| datetime.format(format).to_string())
            .unwrap_or_else(|| start.to_string());

        Period { start, label }
    }
}

/// Buckets `activity` by the periods of `policy`, in chronological order.
///
/// Received amounts are summed into `received_total`, sent amounts into `sent_total` as
/// a magnitude. Each bucket records the lowest and highest height it has seen.
pub fn aggregate_daily<A>(
    activity: &[MergedActivity],
    policy: &dyn PeriodPolicy,
    arith: &A,
) -> Result<Vec<DailyBucket>>
where
    A: AmountArithmetic + ?Sized,
{
    let mut buckets: BTreeMap<i64, DailyBucket> = BTreeMap::new();

    for item in activity {
        let Period { start, label } = policy.period_of(item.timestamp);

        let bucket = buckets.entry(start).or_insert_with(|| DailyBucket {
            period_start_height: item.height,
            period_end_height: item.height,
            period_label: label,
            received_total: "0".to_string(),
            sent_total: "0".to_string(),
        });

        bucket.period_start_height = bucket.period_start_height.min(item.height);
        bucket.period_end_height = bucket.period_end_height.max(item.height);

        match item.direction() {
            Direction::Receive => {
                bucket.received_total = arith.add(&bucket.received_total, item.magnitude())?;
            }
            Direction::Send => {
                bucket.sent_total = arith.add(&bucket.sent_total, item.magnitude())?;
            }
        }
    }

    Ok(buckets.into_values().collect())
}

/// One bar of the received/spent chart, totals floored to integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub received: String,
    pub spent: String,
}

/// Projects buckets onto chart points.
pub fn chart_series(buckets: &[DailyBucket]) -> Result<Vec<ChartPoint>> {
    buckets
        .iter()
        .map(|bucket| {
            let received = bucket.received_total.parse::<DecimalAmount>()?.floor();
            let spent = bucket.sent_total.parse::<DecimalAmount>()?.floor();
            Ok(ChartPoint {
                label: bucket.period_label.clone(),
                received: received.to_string(),
                spent: spent.to_string(),
            })
        })
        .collect()
}
