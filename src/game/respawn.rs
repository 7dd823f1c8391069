//! Respawn scheduling for eliminated players

use std::collections::BTreeMap;

use rand::Rng;

use crate::ws::protocol::Keys;

use super::player::{random_angle, PlayerId, PlayerState};
use super::tuning::GameTuning;

/// Whether a dead player has waited long enough
pub fn is_due(player: &PlayerState, now: u64, tuning: &GameTuning) -> bool {
    !player.is_alive && now.saturating_sub(player.death_time) >= tuning.respawn_time_ms
}

/// Bring a player back near map center. Keeps id and color.
pub fn respawn<R: Rng>(player: &mut PlayerState, tuning: &GameTuning, rng: &mut R) {
    let (cx, cy) = tuning.center();
    let jitter = tuning.respawn_jitter;
    let angle = random_angle(rng);

    player.x = cx + rng.gen_range(-jitter..=jitter);
    player.y = cy + rng.gen_range(-jitter..=jitter);
    player.angle = angle;
    player.target_angle = angle;
    player.speed = 0.0;
    player.is_alive = true;
    player.death_time = 0;
    player.radius = tuning.base_player_radius;
    player.keys = Keys::default();
    player.last_processed_input = 0;
}

/// Respawn every due player, returning who came back
pub fn advance<R: Rng>(
    players: &mut BTreeMap<PlayerId, PlayerState>,
    now: u64,
    tuning: &GameTuning,
    rng: &mut R,
) -> Vec<PlayerId> {
    let mut respawned = Vec::new();
    for player in players.values_mut() {
        if is_due(player, now, tuning) {
            respawn(player, tuning, rng);
            respawned.push(player.id.clone());
        }
    }
    respawned
}
