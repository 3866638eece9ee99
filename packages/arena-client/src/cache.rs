use serde_json::Value;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::state::{PlayerState, WorldSnapshot};

/// Holds the one current snapshot and the local player's identity.
#[derive(Debug, Default)]
pub struct WorldCache {
    current: WorldSnapshot,
    own_id: Option<String>,
}

impl WorldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current snapshot with the one carried by `data`.
    ///
    /// The first accepted snapshot also fixes own-identity from
    /// `session_id`; later calls never change it. A rejected payload leaves
    /// the previous snapshot in place.
    pub fn apply_state(&mut self, data: Value, session_id: Option<&str>) -> Result<(), ClientError> {
        let snapshot = WorldSnapshot::from_state(data)?;
        self.current = snapshot;
        debug!(
            players = self.current.players.len(),
            shots = self.current.shots.len(),
            "snapshot replaced"
        );

        if self.own_id.is_none() {
            if let Some(sid) = session_id {
                info!(own_id = sid, "own identity captured");
                self.own_id = Some(sid.to_string());
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.current
    }

    pub fn own_id(&self) -> Option<&str> {
        self.own_id.as_deref()
    }

    pub fn is_own(&self, id: &str) -> bool {
        self.own_id.as_deref() == Some(id)
    }

    pub fn own_player(&self) -> Option<&PlayerState> {
        self.current.player(self.own_id.as_deref()?)
    }

    /// Delay the server reports for the local player, if the current
    /// snapshot has one.
    pub fn own_delay(&self) -> Option<f64> {
        self.own_player()?.delay
    }
}
