use super::new_pipeline;
use crate::cli::params::{CommonParams, UtxoOrder};
use crate::error::Result;
use console::style;

#[derive(Debug, Clone, clap::Args)]
pub struct Utxos {
    /// Order of the listed outputs.
    #[arg(long, value_enum, default_value_t = UtxoOrder::Amount)]
    pub sort: UtxoOrder,

    /// Include time-locked outputs.
    #[arg(long)]
    pub contain_locked: bool,

    /// Print the outputs as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Utxos {
    pub async fn execute(self, common_params: &CommonParams) -> Result<()> {
        let pipeline = new_pipeline(common_params).await?;
        let utxos = pipeline
            .available_utxos(
                &common_params.server_url,
                self.sort.into(),
                self.contain_locked,
            )
            .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&utxos)?);
            return Ok(());
        }

        for utxo in &utxos {
            let locked = if utxo.locked {
                style(" (locked)").yellow().to_string()
            } else {
                String::new()
            };
            println!(
                "{:>6} {}{locked}",
                utxo.id,
                style(&utxo.amount).white().bold()
            );
        }

        Ok(())
    }
}
