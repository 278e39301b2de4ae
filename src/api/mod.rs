pub mod client;
pub mod offline;
pub mod roster;

pub use client::*;
pub use offline::*;
pub use roster::*;

use anyhow::Result;
use serde_json::Value as Json;

/// Upstream endpoints the batch needs. Implemented by [`WbClient`] and, for
/// offline runs, by [`SavedRecords`].
pub trait StatsSource {
    fn fetch_squad_list(&self) -> Result<Vec<String>>;
    fn fetch_squad_members(&self, squad: &str) -> Result<Vec<SquadMember>>;
    fn fetch_player(&self, uid: &str) -> Result<Json>;
}
