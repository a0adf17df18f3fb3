pub mod params;

use crate::commands::daily::Daily;
use crate::commands::history::History;
use crate::commands::local_tx::LocalTx;
use crate::commands::serve::Serve;
use crate::commands::utxos::Utxos;
use crate::error::Result;
use clap::Parser;
use params::CommonParams;

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// List the merged activity history, most recent first.
    History(History),

    /// Show send/receive totals per calendar period.
    Daily(Daily),

    /// List the spendable outputs of the wallet.
    Utxos(Utxos),

    /// Manage the transactions recorded by this wallet.
    #[command(subcommand)]
    LocalTx(LocalTx),

    /// Serve the activity feed over JSON-RPC.
    Serve(Serve),
}

/// Wallet activity feed.
#[derive(Debug, Parser)]
#[clap(name = "walletfeed", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[allow(missing_docs)]
    #[clap(flatten)]
    pub common_params: CommonParams,
}

/// Parse and run command line arguments
pub fn run() -> Result<()> {
    let Cli {
        command,
        common_params,
    } = Cli::parse();

    crate::logging::init(&common_params.log)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match command {
            Command::History(cmd) => cmd.execute(&common_params).await,
            Command::Daily(cmd) => cmd.execute(&common_params).await,
            Command::Utxos(cmd) => cmd.execute(&common_params).await,
            Command::LocalTx(cmd) => cmd.execute(&common_params).await,
            Command::Serve(cmd) => cmd.execute(&common_params).await,
        }
    })
}
