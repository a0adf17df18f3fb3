use super::{activity_query, new_pipeline};
use crate::cli::params::{CommonParams, Period, Timestamps};
use crate::error::Result;
use console::style;
use walletfeed_activity::{
    CalendarPeriod, ChartPoint, RECEIVED_SERIES, SPENT_SERIES, aggregate_daily, chart_series,
};
use walletfeed_primitives::HistoryType;

#[derive(Debug, Clone, clap::Args)]
pub struct Daily {
    /// Length of the aggregation period.
    #[arg(long, value_enum, default_value_t = Period::Day)]
    pub period: Period,

    /// Unit of the timestamps reported by the remote wallet service.
    #[arg(long, value_enum, default_value_t = Timestamps::Millis)]
    pub timestamp_unit: Timestamps,

    /// Print integer chart points instead of the exact totals.
    #[arg(long)]
    pub chart: bool,

    /// Print the totals as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Daily {
    pub async fn execute(self, common_params: &CommonParams) -> Result<()> {
        let pipeline = new_pipeline(common_params).await?;
        let activity = pipeline
            .query(&activity_query(common_params, HistoryType::All))
            .await?;

        let policy = CalendarPeriod::new(self.period.into(), self.timestamp_unit.into());
        let buckets = aggregate_daily(&activity, &policy, pipeline.arithmetic())?;

        match (self.chart, self.json) {
            (true, true) => {
                let points = chart_series(&buckets)?;
                println!("{}", serde_json::to_string_pretty(&points)?);
            }
            (true, false) => {
                for point in chart_series(&buckets)? {
                    println!("{}", render_point(&point));
                }
            }
            (false, true) => println!("{}", serde_json::to_string_pretty(&buckets)?),
            (false, false) => {
                for bucket in &buckets {
                    println!("{}", bucket.summary_line());
                }
            }
        }

        Ok(())
    }
}

fn render_point(point: &ChartPoint) -> String {
    format!(
        "{} {RECEIVED_SERIES}: {} {SPENT_SERIES}: {}",
        style(&point.label).white().bold(),
        style(&point.received).green(),
        style(&point.spent).red(),
    )
}
