use super::new_pipeline;
use crate::cli::params::CommonParams;
use crate::error::Result;
use jsonrpsee::server::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use walletfeed_rpc::{HistorySnapshots, WalletfeedRpc};

#[derive(Debug, Clone, clap::Args)]
pub struct Serve {
    /// Listen address of the JSON-RPC server.
    #[arg(long, value_name = "ADDR", default_value = "127.0.0.1:9801")]
    pub rpc_addr: SocketAddr,
}

impl Serve {
    pub async fn execute(self, common_params: &CommonParams) -> Result<()> {
        let pipeline = Arc::new(new_pipeline(common_params).await?);

        let mut methods = jsonrpsee::Methods::new();
        WalletfeedRpc::new(pipeline, Arc::new(HistorySnapshots::new())).merge_into(&mut methods)?;

        let server = Server::builder().build(self.rpc_addr).await?;
        let local_addr = server.local_addr()?;
        let handle = server.start(methods);

        tracing::info!(
            addr = %local_addr,
            server_url = %common_params.server_url,
            "Activity RPC server started"
        );

        tokio::signal::ctrl_c().await?;

        tracing::info!("Shutting down activity RPC server");
        if handle.stop().is_ok() {
            handle.stopped().await;
        }

        Ok(())
    }
}
