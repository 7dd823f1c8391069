//! Game simulation modules

pub mod arena;
pub mod collision;
pub mod physics;
pub mod player;
pub mod respawn;
pub mod snapshot;
pub mod tuning;
pub mod world;

pub use arena::{Arena, ArenaEvent, ArenaHandle};
pub use player::{PlayerId, PlayerState};
