//! Game state and core simulation types
//!
//! Everything one run needs lives here: the arena, the alert channel, the
//! player, the enemy and projectile collections and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorKind};
use super::alert::GlobalAlert;
use super::arena::Arena;
use super::combat::{Katana, KillMethod, Projectile, ProjectileSource};
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Bound on spawn rejection sampling
pub const SPAWN_ATTEMPTS: u32 = 256;
/// Spawn candidates are sampled this far from the screen edges
pub const SPAWN_MARGIN: f32 = 60.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Menu overlay; nothing advances
    Paused,
    /// Run ended; terminal until restart
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    EnemyContact,
    EnemyProjectile,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled {
        kind: ActorKind,
        points: u64,
        stealth: bool,
        by: KillMethod,
    },
    ProjectileLaunched {
        source: ProjectileSource,
    },
    /// `wave` is the wave that was just cleared
    WaveCleared {
        wave: u32,
    },
    /// Background music level change
    MusicLevel(u8),
    GameOver {
        cause: GameOverCause,
    },
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Aim angle (radians)
    pub facing: f32,
    pub katana: Katana,
    /// Seconds until the next throw; never negative
    pub fire_cooldown: f32,
    pub alive: bool,
    pub anim: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            facing: 0.0,
            katana: Katana::default(),
            fire_cooldown: 0.0,
            alive: true,
            anim: 0,
        }
    }

    /// Body box
    pub fn body(&self, tuning: &Tuning) -> Rect {
        Rect::square(self.pos, tuning.player_radius * 2.0)
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub alert: GlobalAlert,
    pub player: Player,
    /// Active enemies, in update order
    pub actors: Vec<Actor>,
    pub projectiles: Vec<Projectile>,
    /// Current wave (1-based)
    pub wave: u32,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self::with_arena(seed, tuning, Arena::standard())
    }

    /// Start wave 1 with the initial Chasers
    pub fn with_arena(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let mut state = Self::bare(seed, tuning, arena);
        let min_dist = state.tuning.chaser_spawn_distance;
        for _ in 0..INITIAL_CHASERS {
            state.spawn_actor(ActorKind::Chaser, min_dist);
        }
        log::info!("Run started (seed {seed}) with {} enemies", state.actors.len());
        state
    }

    /// A run with no enemies at all
    pub fn bare(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let (sx, sy) = PLAYER_START;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            alert: GlobalAlert::new(tuning.alert_expiry),
            tuning,
            arena,
            player: Player::new(Vec2::new(sx, sy)),
            actors: Vec::new(),
            projectiles: Vec::new(),
            wave: 1,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an enemy at a sampled position farther than `min_dist` from the
    /// player
    pub fn spawn_actor(&mut self, kind: ActorKind, min_dist: f32) -> u32 {
        let pos = self.sample_spawn_point(min_dist);
        let id = self.next_entity_id();
        let actor = Actor::spawn(id, kind, pos, &self.tuning, &mut self.rng);
        self.actors.push(actor);
        id
    }

    /// Rejection-sample a free point farther than `min_dist` from the player.
    /// Falls back to the farthest free candidate seen, then to the farthest
    /// candidate of any kind.
    pub fn sample_spawn_point(&mut self, min_dist: f32) -> Vec2 {
        let player = self.player.pos;
        let size = self.tuning.enemy_size;
        let mut best: Option<(Vec2, f32, bool)> = None;

        for _ in 0..SPAWN_ATTEMPTS {
            let candidate = self.arena.random_point(&mut self.rng, SPAWN_MARGIN);
            let free = !self.arena.is_blocked(&Rect::square(candidate, size));
            let dist = candidate.distance(player);
            if free && dist > min_dist {
                return candidate;
            }
            let better = match best {
                None => true,
                Some((_, best_dist, best_free)) => {
                    (free && !best_free) || (free == best_free && dist > best_dist)
                }
            };
            if better {
                best = Some((candidate, dist, free));
            }
        }

        log::warn!("No spawn point farther than {min_dist} from the player, using best candidate");
        best.map(|(p, _, _)| p).unwrap_or(player)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Music level for the current wave
    pub fn music_level(&self) -> u8 {
        if self.wave >= self.tuning.music_level_two_wave {
            2
        } else {
            1
        }
    }
}
