//! Arena state and authoritative tick loop

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::util::time::{unix_millis, Timer};
use crate::ws::protocol::ClientMsg;

use super::player::PlayerId;
use super::snapshot::{EncodedSnapshot, SnapshotBuilder};
use super::world::World;

/// Gateway -> arena notifications, applied at the start of the next tick
#[derive(Debug, Clone)]
pub enum ArenaEvent {
    Connect { player_id: PlayerId },
    Input { player_id: PlayerId, msg: ClientMsg },
    Disconnect { player_id: PlayerId },
}

/// Counters published by the tick task for readers outside it
#[derive(Debug, Default)]
pub struct ArenaStats {
    players: AtomicUsize,
    alive_players: AtomicUsize,
    tick: AtomicU64,
}

impl ArenaStats {
    pub fn players(&self) -> usize {
        self.players.load(Ordering::Relaxed)
    }

    pub fn alive_players(&self) -> usize {
        self.alive_players.load(Ordering::Relaxed)
    }

    pub fn tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }
}

/// Handle to the running arena
#[derive(Clone)]
pub struct ArenaHandle {
    pub event_tx: mpsc::Sender<ArenaEvent>,
    pub snapshot_tx: broadcast::Sender<EncodedSnapshot>,
    pub stats: Arc<ArenaStats>,
}

impl ArenaHandle {
    /// Receive every snapshot broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EncodedSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Queue an event for the next tick. Fails only if the arena is gone.
    pub async fn send(&self, event: ArenaEvent) -> bool {
        self.event_tx.send(event).await.is_ok()
    }
}

/// The authoritative game arena
pub struct Arena {
    world: World,
    rng: ChaCha8Rng,
    tick: u64,
    tick_period: Duration,
    event_rx: mpsc::Receiver<ArenaEvent>,
    snapshot_tx: broadcast::Sender<EncodedSnapshot>,
    snapshot_builder: SnapshotBuilder,
    stats: Arc<ArenaStats>,
}

impl Arena {
    /// Create an arena seeded from OS entropy
    pub fn new(config: &Config) -> (Self, ArenaHandle) {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    pub fn with_rng(config: &Config, rng: ChaCha8Rng) -> (Self, ArenaHandle) {
        let (event_tx, event_rx) = mpsc::channel(config.event_queue_capacity);
        let (snapshot_tx, _) = broadcast::channel(config.snapshot_buffer);
        let stats = Arc::new(ArenaStats::default());

        let handle = ArenaHandle {
            event_tx,
            snapshot_tx: snapshot_tx.clone(),
            stats: stats.clone(),
        };

        let arena = Self {
            world: World::new(config.tuning),
            rng,
            tick: 0,
            tick_period: Duration::from_micros(1_000_000 / u64::from(config.tick_rate_hz)),
            event_rx,
            snapshot_tx,
            snapshot_builder: SnapshotBuilder::new(),
            stats,
        };

        (arena, handle)
    }

    #[cfg(test)]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run the fixed-rate tick loop until the task is dropped
    pub async fn run(mut self) {
        info!(
            tick_period_us = self.tick_period.as_micros() as u64,
            "Arena started"
        );

        // interval deadlines are start + n * period, so lateness does not accumulate
        let mut tick_interval = interval(self.tick_period);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            let timer = Timer::new();
            self.tick(unix_millis());

            let elapsed = timer.elapsed_micros();
            if elapsed > self.tick_period.as_micros() as u64 {
                warn!(
                    tick = self.tick,
                    elapsed_us = elapsed,
                    players = self.world.len(),
                    snapshot_bytes = self.snapshot_builder.last_bytes(),
                    "Tick overran its period"
                );
            }
        }
    }

    /// One full tick: drain events, simulate, broadcast
    pub fn tick(&mut self, now: u64) {
        self.process_events();
        self.tick += 1;

        let report = self.world.step(now, &mut self.rng);
        for elimination in &report.eliminations {
            debug!(
                tick = self.tick,
                eater_id = %elimination.eater_id,
                eaten_id = %elimination.eaten_id,
                "Player eliminated"
            );
        }
        for player_id in &report.respawned {
            debug!(tick = self.tick, player_id = %player_id, "Player respawned");
        }

        self.publish_stats();
        self.broadcast();
    }

    /// Apply what the gateway queued before this tick began.
    /// Events arriving mid-drain wait for the next tick.
    fn process_events(&mut self) {
        let pending = self.event_rx.len();
        self.drain_events(pending);
    }

    fn drain_events(&mut self, limit: usize) {
        for _ in 0..limit {
            let Ok(event) = self.event_rx.try_recv() else {
                break;
            };
            match event {
                ArenaEvent::Connect { player_id } => self.handle_connect(player_id),
                ArenaEvent::Input { player_id, msg } => self.handle_input(&player_id, msg),
                ArenaEvent::Disconnect { player_id } => self.handle_disconnect(&player_id),
            }
        }
    }

    fn handle_connect(&mut self, player_id: PlayerId) {
        if self.world.add_player(player_id.clone(), &mut self.rng) {
            info!(player_id = %player_id, players = self.world.len(), "Player joined arena");
        } else {
            warn!(player_id = %player_id, "Player already in arena");
        }
    }

    fn handle_input(&mut self, player_id: &str, msg: ClientMsg) {
        match msg {
            ClientMsg::Input {
                keys,
                target_angle,
                sequence,
            } => {
                self.world.apply_input(player_id, keys, target_angle, sequence);
            }
        }
    }

    fn handle_disconnect(&mut self, player_id: &str) {
        if self.world.remove_player(player_id).is_some() {
            info!(player_id = %player_id, players = self.world.len(), "Player left arena");
        }
    }

    fn publish_stats(&self) {
        self.stats.players.store(self.world.len(), Ordering::Relaxed);
        self.stats
            .alive_players
            .store(self.world.alive_count(), Ordering::Relaxed);
        self.stats.tick.store(self.tick, Ordering::Relaxed);
    }

    fn broadcast(&mut self) {
        match self.snapshot_builder.build(self.world.players()) {
            Ok(snapshot) => {
                // No receivers is fine: nobody is connected
                let _ = self.snapshot_tx.send(snapshot);
            }
            Err(e) => {
                error!(tick = self.tick, error = %e, "Failed to encode snapshot");
            }
        }
    }
}
