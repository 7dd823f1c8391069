//! Player movement: steering, thrust, friction and bounds

use std::f64::consts::{PI, TAU};

use super::player::PlayerState;
use super::tuning::GameTuning;

/// Physics system for updating player positions and speeds
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Wrap an angle difference into (-π, π]
    pub fn normalize_angle_delta(mut delta: f64) -> f64 {
        if !delta.is_finite() {
            return delta;
        }
        // Huge inputs: a single +-TAU step would be lost to rounding
        if delta.abs() > TAU {
            delta = delta.rem_euclid(TAU);
        }
        while delta <= -PI {
            delta += TAU;
        }
        while delta > PI {
            delta -= TAU;
        }
        delta
    }

    /// Advance one alive player by one tick
    pub fn update_player(player: &mut PlayerState, tuning: &GameTuning) {
        // Turning is instant; the cost is paid in speed
        let delta = Self::normalize_angle_delta(player.target_angle - player.angle);
        player.angle = player.target_angle;
        player.speed *= 1.0 - delta.abs() * tuning.rotational_friction_factor;

        player.speed = Self::apply_intent(player.speed, player.keys.forward, player.keys.brake, tuning);
        player.speed = player.speed.clamp(tuning.min_speed(), tuning.max_speed);

        player.x += player.speed * player.angle.cos();
        player.y += player.speed * player.angle.sin();

        player.radius = tuning.radius_for_speed(player.speed);
        Self::clamp_to_bounds(player, tuning);
    }

    /// New speed after thrust, brake or coasting. Thrust takes priority over brake.
    pub fn apply_intent(speed: f64, forward: bool, brake: bool, tuning: &GameTuning) -> f64 {
        if forward {
            speed + (tuning.max_speed - speed) * tuning.thrust_factor
        } else if brake {
            (speed - tuning.brake_power) * tuning.friction
        } else {
            speed * tuning.coasting_friction
        }
    }

    /// Keep the whole body inside the map, using the current radius
    pub fn clamp_to_bounds(player: &mut PlayerState, tuning: &GameTuning) {
        let r = player.radius;
        player.x = player.x.min(tuning.map_width - r).max(r);
        player.y = player.y.min(tuning.map_height - r).max(r);
    }

    /// Check whether two circles overlap (strictly)
    pub fn check_overlap(x1: f64, y1: f64, radius1: f64, x2: f64, y2: f64, radius2: f64) -> bool {
        let dx = x1 - x2;
        let dy = y1 - y2;
        let distance = (dx * dx + dy * dy).sqrt();
        distance < radius1 + radius2
    }
}
