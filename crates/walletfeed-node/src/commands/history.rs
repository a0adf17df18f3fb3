use super::{activity_query, new_pipeline};
use crate::cli::params::{CommonParams, HistoryFilter};
use crate::error::Result;
use console::style;
use walletfeed_primitives::{Direction, MergedActivity};

#[derive(Debug, Clone, clap::Args)]
pub struct History {
    /// Which activities to list.
    #[arg(long, value_enum, default_value_t = HistoryFilter::All)]
    pub history_type: HistoryFilter,

    /// Print the activities as JSON.
    #[arg(long)]
    pub json: bool,
}

impl History {
    pub async fn execute(self, common_params: &CommonParams) -> Result<()> {
        let pipeline = new_pipeline(common_params).await?;
        let activity = pipeline
            .query(&activity_query(common_params, self.history_type.into()))
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&activity)?);
            return Ok(());
        }

        if activity.is_empty() {
            println!("No activity");
        }

        for item in &activity {
            println!("{}", render(item));
        }

        Ok(())
    }
}

fn render(item: &MergedActivity) -> String {
    let message = match item.direction() {
        Direction::Receive => style(&item.message).green(),
        Direction::Send => style(&item.message).red(),
    };

    let mut line = format!(
        "#{:<8} {:>14} {} ({} output{})",
        style(item.height).white().bold(),
        item.timestamp,
        message,
        item.utxos.len(),
        if item.utxos.len() == 1 { "" } else { "s" },
    );

    if let Some(txid) = &item.txid {
        line.push_str(&format!(" txid: {txid}"));
    }
    if let Some(fee) = &item.fee {
        line.push_str(&format!(" fee: {fee}"));
    }

    line
}
