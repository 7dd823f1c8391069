//! Authoritative per-player state

use rand::Rng;
use serde::Serialize;

use crate::ws::protocol::Keys;

use super::tuning::GameTuning;

/// Opaque player identity assigned by the gateway
pub type PlayerId = String;

/// Player state (authoritative). Serialized as-is into every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Snapshot key, not repeated inside the entry
    #[serde(skip)]
    pub id: PlayerId,

    pub x: f64,
    pub y: f64,
    pub color: String,

    pub angle: f64,
    pub target_angle: f64,
    pub speed: f64,

    pub is_alive: bool,
    /// Unix millis of the last elimination, 0 while alive
    pub death_time: u64,
    pub radius: f64,

    pub keys: Keys,
    pub last_processed_input: u64,
}

impl PlayerState {
    /// Fresh player at rest, facing `angle`
    pub fn new(id: PlayerId, color: String, x: f64, y: f64, angle: f64, tuning: &GameTuning) -> Self {
        Self {
            id,
            x,
            y,
            color,
            angle,
            target_angle: angle,
            speed: 0.0,
            is_alive: true,
            death_time: 0,
            radius: tuning.base_player_radius,
            keys: Keys::default(),
            last_processed_input: 0,
        }
    }

    /// Spawn at map center with a random heading and color
    pub fn spawn<R: Rng>(id: PlayerId, tuning: &GameTuning, rng: &mut R) -> Self {
        let (cx, cy) = tuning.center();
        let angle = random_angle(rng);
        Self::new(id, random_color(rng), cx, cy, angle, tuning)
    }

    /// Radius used for overlap tests
    pub fn hitbox_radius(&self) -> f64 {
        self.radius / 4.0
    }

    /// Mark as eaten at `now` (unix millis)
    pub fn eliminate(&mut self, now: u64) {
        self.is_alive = false;
        self.death_time = now;
        self.speed = 0.0;
    }
}

pub fn random_angle<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..std::f64::consts::TAU)
}

/// Fully saturated hue, CSS `hsl()` syntax
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    let hue: f64 = rng.gen_range(0.0..360.0);
    format!("hsl({}, 100%, 50%)", hue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::Value;

    #[test]
    fn spawn_at_center_at_rest() {
        let tuning = GameTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let p = PlayerState::spawn("p1".to_string(), &tuning, &mut rng);

        assert_eq!((p.x, p.y), (2500.0, 1400.0));
        assert_eq!(p.speed, 0.0);
        assert_eq!(p.radius, tuning.base_player_radius);
        assert_eq!(p.angle, p.target_angle);
        assert!((0.0..std::f64::consts::TAU).contains(&p.angle));
        assert!(p.is_alive);
        assert!(p.color.starts_with("hsl(") && p.color.ends_with(", 100%, 50%)"));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let tuning = GameTuning::default();
        let p = PlayerState::new("p1".to_string(), "red".to_string(), 1.0, 2.0, 0.5, &tuning);
        let value = serde_json::to_value(&p).unwrap();

        for key in [
            "x",
            "y",
            "color",
            "angle",
            "targetAngle",
            "speed",
            "isAlive",
            "deathTime",
            "radius",
            "keys",
            "lastProcessedInput",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value.get("id").is_none());
        assert_eq!(value["keys"]["w"], Value::Bool(false));
        assert_eq!(value["keys"]["s"], Value::Bool(false));
    }

    #[test]
    fn eliminate_zeroes_speed() {
        let tuning = GameTuning::default();
        let mut p = PlayerState::new("p".to_string(), "c".to_string(), 0.0, 0.0, 0.0, &tuning);
        p.speed = 50.0;
        p.eliminate(1234);
        assert!(!p.is_alive);
        assert_eq!(p.death_time, 1234);
        assert_eq!(p.speed, 0.0);
    }
}
