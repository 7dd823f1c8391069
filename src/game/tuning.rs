//! Gameplay constants

/// Arena and movement tuning.
///
/// Speeds are in map units per tick; there is no delta-time scaling, so
/// changing the tick rate changes how fast the game plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameTuning {
    /// Map width in world units
    pub map_width: f64,
    /// Map height in world units
    pub map_height: f64,
    /// Fraction of the remaining gap to MAX_SPEED gained per thrusting tick
    pub thrust_factor: f64,
    /// Speed removed per braking tick (before friction)
    pub brake_power: f64,
    /// Friction multiplier applied while braking
    pub friction: f64,
    /// Friction multiplier applied while coasting
    pub coasting_friction: f64,
    /// Forward speed cap; reverse is capped at half of this
    pub max_speed: f64,
    /// Speed lost per radian of turn
    pub rotational_friction_factor: f64,
    /// Radius of a stationary player
    pub base_player_radius: f64,
    /// How long a dead player waits before respawning
    pub respawn_time_ms: u64,
    /// Max per-axis distance from map center for a respawn
    pub respawn_jitter: f64,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            map_width: 5000.0,
            map_height: 2800.0,
            thrust_factor: 0.00015,
            brake_power: 0.1,
            friction: 0.99,
            coasting_friction: 0.9983,
            max_speed: 200.0,
            rotational_friction_factor: 0.1,
            base_player_radius: 10.0,
            respawn_time_ms: 10_000,
            respawn_jitter: 200.0,
        }
    }
}

impl GameTuning {
    pub fn min_speed(&self) -> f64 {
        -self.max_speed / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.map_width / 2.0, self.map_height / 2.0)
    }

    /// Body radius for a given speed; grows with |speed| up to 31x base.
    pub fn radius_for_speed(&self, speed: f64) -> f64 {
        self.base_player_radius * (1.0 + 30.0 * (speed.abs() / self.max_speed))
    }
}
