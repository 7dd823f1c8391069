//! Player registry and the per-tick simulation passes

use std::collections::BTreeMap;

use rand::Rng;

use crate::ws::protocol::Keys;

use super::collision::{CollisionSystem, Elimination};
use super::physics::PhysicsSystem;
use super::player::{PlayerId, PlayerState};
use super::respawn;
use super::tuning::GameTuning;

/// What happened during one simulation step
#[derive(Debug, Default)]
pub struct StepReport {
    pub eliminations: Vec<Elimination>,
    pub respawned: Vec<PlayerId>,
}

/// The authoritative player registry. Owned by exactly one tick task.
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: GameTuning,
    players: BTreeMap<PlayerId, PlayerState>,
}

impl World {
    pub fn new(tuning: GameTuning) -> Self {
        Self {
            tuning,
            players: BTreeMap::new(),
        }
    }

    pub fn players(&self) -> &BTreeMap<PlayerId, PlayerState> {
        &self.players
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Direct access for setting up scenarios
    #[cfg(test)]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.is_alive).count()
    }

    /// Add a freshly spawned player. Returns false if the id is already taken.
    pub fn add_player<R: Rng>(&mut self, id: PlayerId, rng: &mut R) -> bool {
        if self.players.contains_key(&id) {
            return false;
        }
        let player = PlayerState::spawn(id.clone(), &self.tuning, rng);
        self.players.insert(id, player);
        true
    }

    pub fn remove_player(&mut self, id: &str) -> Option<PlayerState> {
        self.players.remove(id)
    }

    /// Overwrite a player's intent. Unknown ids are ignored.
    pub fn apply_input(&mut self, id: &str, keys: Keys, target_angle: f64, sequence: u64) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.keys = keys;
                player.target_angle = target_angle;
                player.last_processed_input = sequence;
                true
            }
            None => false,
        }
    }

    /// Physics, then collisions, then respawns. `now` is unix millis.
    pub fn step<R: Rng>(&mut self, now: u64, rng: &mut R) -> StepReport {
        for player in self.players.values_mut() {
            if player.is_alive {
                PhysicsSystem::update_player(player, &self.tuning);
            }
        }

        let eliminations = CollisionSystem::resolve(&mut self.players, now);
        let respawned = respawn::advance(&mut self.players, now, &self.tuning, rng);

        StepReport {
            eliminations,
            respawned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_with(ids: &[&str]) -> (World, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut world = World::new(GameTuning::default());
        for id in ids {
            assert!(world.add_player(id.to_string(), &mut rng));
        }
        (world, rng)
    }

    #[test]
    fn one_entry_per_identity() {
        let (mut world, mut rng) = world_with(&["a"]);
        assert!(!world.add_player("a".to_string(), &mut rng));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn input_is_last_write_wins() {
        let (mut world, _) = world_with(&["a"]);
        let forward = Keys {
            forward: true,
            brake: false,
        };
        let brake = Keys {
            forward: false,
            brake: true,
        };
        assert!(world.apply_input("a", forward, 1.0, 5));
        assert!(world.apply_input("a", brake, -2.0, 3));

        let p = world.get("a").unwrap();
        assert_eq!(p.keys, brake);
        assert_eq!(p.target_angle, -2.0);
        assert_eq!(p.last_processed_input, 3);
    }

    #[test]
    fn input_for_unknown_id_is_dropped() {
        let (mut world, _) = world_with(&["a"]);
        let before = world.players().clone();
        assert!(!world.apply_input("ghost", Keys::default(), 1.0, 1));
        assert_eq!(world.players(), &before);
    }

    #[test]
    fn removal_works_for_dead_players() {
        let (mut world, _) = world_with(&["a", "b"]);
        world.get_mut("a").unwrap().eliminate(10);
        assert!(world.remove_player("a").is_some());
        assert!(world.remove_player("a").is_none());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn dead_players_skip_physics() {
        let (mut world, mut rng) = world_with(&["a"]);
        world.apply_input(
            "a",
            Keys {
                forward: true,
                brake: false,
            },
            1.0,
            1,
        );
        world.get_mut("a").unwrap().eliminate(1_000);
        let before = world.get("a").unwrap().clone();

        world.step(2_000, &mut rng);
        assert_eq!(world.get("a").unwrap(), &before);
    }

    #[test]
    fn step_collides_after_integration() {
        // Both spawn at center; a is moving fast so it is much larger
        let (mut world, mut rng) = world_with(&["a", "b"]);
        {
            let a = world.get_mut("a").unwrap();
            a.speed = 20.0;
            a.angle = 0.0;
            a.target_angle = 0.0;
            a.x = 2480.0;
            a.y = 1400.0;
        }
        {
            let b = world.get_mut("b").unwrap();
            b.x = 2500.0;
            b.y = 1400.0;
            b.angle = 0.0;
            b.target_angle = 0.0;
        }

        let report = world.step(50_000, &mut rng);

        assert_eq!(report.eliminations.len(), 1);
        assert_eq!(report.eliminations[0].eaten_id, "b");
        let b = world.get("b").unwrap();
        assert!(!b.is_alive);
        assert_eq!(b.death_time, 50_000);
        assert_eq!(world.alive_count(), 1);
    }

    #[test]
    fn full_cycle_death_then_respawn() {
        let (mut world, mut rng) = world_with(&["a"]);
        world.get_mut("a").unwrap().eliminate(1_000);

        assert!(world.step(10_999, &mut rng).respawned.is_empty());
        let report = world.step(11_000, &mut rng);
        assert_eq!(report.respawned, vec!["a".to_string()]);
        assert!(world.get("a").unwrap().is_alive);
    }
}
