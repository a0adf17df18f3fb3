//! Local history of transactions initiated by this wallet.
//!
//! Two [`LocalHistoryStore`](walletfeed_primitives::LocalHistoryStore) backends are
//! provided: [`SqliteHistoryStore`] persisting to a SQLite file and [`InMemHistoryStore`]
//! for ephemeral sessions.

mod db;
mod in_mem;

pub use db::{Error, Result, SqliteHistoryStore};
pub use in_mem::InMemHistoryStore;
