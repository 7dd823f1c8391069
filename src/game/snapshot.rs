//! Snapshot encoding for network transmission

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::ws::protocol::ServerMsg;

use super::player::{PlayerId, PlayerState};

/// A `state` frame, encoded once and shared by every connection
pub type EncodedSnapshot = Arc<str>;

/// Builds full-world snapshots
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    /// Size of the last encoded snapshot
    last_bytes: usize,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every player, alive or dead
    pub fn build(
        &mut self,
        players: &BTreeMap<PlayerId, PlayerState>,
    ) -> Result<EncodedSnapshot, serde_json::Error> {
        let json = ServerMsg::State { players }.encode()?;
        self.last_bytes = json.len();
        Ok(Arc::from(json))
    }

    pub fn last_bytes(&self) -> usize {
        self.last_bytes
    }
}
