//! Katana sweeps, projectiles and scoring
//!
//! Removal during a pass never happens in place: hits are marked first and
//! the collections are compacted afterwards, so collection order decides
//! which enemy a projectile hits when it overlaps several.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorKind};
use super::arena::Arena;
use super::rect::Rect;
use crate::heading;
use crate::tuning::Tuning;

/// Who threw a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Enemy,
}

/// A thrown shuriken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub rect: Rect,
    /// Unit travel direction
    pub dir: Vec2,
    pub source: ProjectileSource,
}

impl Projectile {
    pub fn new(center: Vec2, dir: Vec2, source: ProjectileSource, size: f32) -> Self {
        Self {
            rect: Rect::square(center, size),
            dir,
            source,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// The player's sweeping katana
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Katana {
    pub active: bool,
    /// Offset from the aim direction (degrees)
    pub sweep: f32,
    /// +1 or -1
    pub direction: f32,
}

impl Default for Katana {
    fn default() -> Self {
        Self {
            active: false,
            sweep: 0.0,
            direction: 1.0,
        }
    }
}

impl Katana {
    /// Advance the sweep while held; releasing recenters the blade
    pub fn update(&mut self, held: bool, dt: f32, tuning: &Tuning) {
        self.active = held;
        if !held {
            self.sweep = 0.0;
            return;
        }

        let limit = tuning.katana_sweep_limit;
        self.sweep += tuning.katana_sweep_speed * dt * self.direction;
        if self.sweep.abs() >= limit {
            self.sweep = self.sweep.clamp(-limit, limit);
            self.direction = -self.direction;
        }
    }

    /// Blade tip for a player at `origin` aiming along `aim` (radians)
    pub fn hit_point(&self, origin: Vec2, aim: f32, tuning: &Tuning) -> Vec2 {
        origin + heading(aim + self.sweep.to_radians()) * tuning.katana_reach
    }

    pub fn hit_box(&self, origin: Vec2, aim: f32, tuning: &Tuning) -> Rect {
        Rect::square(self.hit_point(origin, aim, tuning), tuning.katana_hit_size)
    }
}

/// How an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillMethod {
    Katana,
    Projectile,
}

/// A scored kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kill {
    pub actor_id: u32,
    pub kind: ActorKind,
    pub points: u64,
    pub stealth: bool,
    pub by: KillMethod,
}

impl Kill {
    /// Score a kill from the victim's state at the moment it dies
    pub fn score(actor: &Actor, by: KillMethod, tuning: &Tuning) -> Self {
        let kind = actor.kind();
        let stealth = actor.is_stealth_killable();
        Self {
            actor_id: actor.id,
            kind,
            points: tuning.kill_points(kind.base_points(tuning), stealth),
            stealth,
            by,
        }
    }
}

/// Kill every actor whose body overlaps the katana hit box
pub fn resolve_melee(hit_box: &Rect, actors: &mut Vec<Actor>, tuning: &Tuning) -> Vec<Kill> {
    let mut kills = Vec::new();
    actors.retain(|actor| {
        if hit_box.overlaps(&actor.body()) {
            kills.push(Kill::score(actor, KillMethod::Katana, tuning));
            false
        } else {
            true
        }
    });
    kills
}

/// Move projectiles, dropping any that hit an obstacle or leave the screen.
/// Returns how many were dropped.
pub fn advance_projectiles(
    projectiles: &mut Vec<Projectile>,
    arena: &Arena,
    speed: f32,
    dt: f32,
) -> usize {
    let before = projectiles.len();
    for p in projectiles.iter_mut() {
        p.rect = p.rect.translated(p.dir * speed * dt);
    }
    projectiles.retain(|p| !arena.is_blocked(&p.rect) && arena.on_screen(&p.rect));
    before - projectiles.len()
}

/// Result of projectile-vs-body resolution for one frame
#[derive(Debug, Default)]
pub struct HitReport {
    pub kills: Vec<Kill>,
    /// An enemy projectile reached the player
    pub player_hit: bool,
}

/// Resolve projectile hits against enemies and the player
///
/// A player projectile kills the first overlapping enemy in collection order
/// and is consumed. Enemy projectiles only ever hit the player.
pub fn resolve_projectile_hits(
    projectiles: &mut Vec<Projectile>,
    actors: &mut Vec<Actor>,
    player_body: &Rect,
    tuning: &Tuning,
) -> HitReport {
    let mut report = HitReport::default();
    let mut projectile_alive = vec![true; projectiles.len()];
    let mut actor_alive = vec![true; actors.len()];

    for (pi, projectile) in projectiles.iter().enumerate() {
        match projectile.source {
            ProjectileSource::Player => {
                let victim = actors
                    .iter()
                    .enumerate()
                    .find(|(ai, actor)| actor_alive[*ai] && projectile.rect.overlaps(&actor.body()));
                if let Some((ai, actor)) = victim {
                    report
                        .kills
                        .push(Kill::score(actor, KillMethod::Projectile, tuning));
                    actor_alive[ai] = false;
                    projectile_alive[pi] = false;
                }
            }
            ProjectileSource::Enemy => {
                if projectile.rect.overlaps(player_body) {
                    report.player_hit = true;
                    projectile_alive[pi] = false;
                }
            }
        }
    }

    compact(projectiles, &projectile_alive);
    compact(actors, &actor_alive);
    report
}

/// Keep the items whose flag is set, preserving order
fn compact<T>(items: &mut Vec<T>, keep: &[bool]) {
    *items = items
        .drain(..)
        .zip(keep.iter().copied())
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect();
}
