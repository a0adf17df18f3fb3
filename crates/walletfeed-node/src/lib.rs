//! Walletfeed Node Library.
//!
//! Runs the wallet activity feed as a CLI application: one-shot history, daily totals
//! and UTXO listings, or a long running JSON-RPC server.

mod cli;
mod commands;
mod error;
mod logging;
mod rpc_client;

pub use self::cli::run;
pub use self::error::{Error, Result};
