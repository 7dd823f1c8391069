//! Collision system - size-based elimination

use std::collections::BTreeMap;

use super::physics::PhysicsSystem;
use super::player::{PlayerId, PlayerState};

/// One player eating another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub eater_id: PlayerId,
    pub eaten_id: PlayerId,
}

/// Collision system for overlap tests between players
pub struct CollisionSystem;

impl CollisionSystem {
    /// Which of two overlapping players gets eaten, if any.
    /// Strictly larger radius wins; equal radii bounce off nothing.
    pub fn loser<'a>(p1: &'a PlayerState, p2: &'a PlayerState) -> Option<&'a PlayerState> {
        if p1.radius > p2.radius {
            Some(p2)
        } else if p2.radius > p1.radius {
            Some(p1)
        } else {
            None
        }
    }

    /// Check every pair of alive players once, in registry order.
    ///
    /// A player eaten by an earlier pair is skipped for the rest of the
    /// pass, so three-way overlaps resolve by iteration order.
    pub fn resolve(players: &mut BTreeMap<PlayerId, PlayerState>, now: u64) -> Vec<Elimination> {
        let alive_ids: Vec<PlayerId> = players
            .values()
            .filter(|p| p.is_alive)
            .map(|p| p.id.clone())
            .collect();

        let mut eliminations = Vec::new();

        for i in 0..alive_ids.len() {
            for j in (i + 1)..alive_ids.len() {
                let (Some(p1), Some(p2)) = (players.get(&alive_ids[i]), players.get(&alive_ids[j])) else {
                    continue;
                };
                if !p1.is_alive || !p2.is_alive {
                    continue;
                }

                if !PhysicsSystem::check_overlap(
                    p1.x,
                    p1.y,
                    p1.hitbox_radius(),
                    p2.x,
                    p2.y,
                    p2.hitbox_radius(),
                ) {
                    continue;
                }

                let Some(loser) = Self::loser(p1, p2) else {
                    continue;
                };
                let (eaten_id, eater_id) = if loser.id == p1.id {
                    (p1.id.clone(), p2.id.clone())
                } else {
                    (p2.id.clone(), p1.id.clone())
                };

                if let Some(eaten) = players.get_mut(&eaten_id) {
                    eaten.eliminate(now);
                }
                eliminations.push(Elimination { eater_id, eaten_id });
            }
        }

        eliminations
    }
}
