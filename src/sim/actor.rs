//! Enemy perception and behavior
//!
//! Both enemy variants share one perception + movement core and one
//! patrol/search state machine. The variant only decides what happens while
//! the player is in sight (pursue, or hold position and throw) and how many
//! points the kill is worth.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::alert::GlobalAlert;
use super::arena::Arena;
use super::collision::{resolve_axes, segment_blocked};
use super::combat::{Projectile, ProjectileSource};
use super::rect::Rect;
use crate::consts::{ANIM_FRAMES, WALL_THICKNESS};
use crate::tuning::Tuning;
use crate::{angle_of, heading, normalize_angle};

/// Waypoints are sampled this far from the screen edges
const WAYPOINT_MARGIN: f32 = 60.0;
/// Probe box used to reject waypoints inside obstacles
const WAYPOINT_PROBE: f32 = 8.0;
const WAYPOINT_ATTEMPTS: u32 = 30;
/// Fallback waypoint offset range when every sample was blocked
const WAYPOINT_FALLBACK: i32 = 100;

/// Enemy variant, as seen by scoring and presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    /// Pursues on sight
    Chaser,
    /// Holds position on sight and throws projectiles
    Shooter,
}

impl ActorKind {
    /// Kill value before the stealth bonus
    pub fn base_points(self, tuning: &Tuning) -> u64 {
        match self {
            ActorKind::Chaser => tuning.chaser_points,
            ActorKind::Shooter => tuning.shooter_points,
        }
    }
}

/// Variant-specific runtime state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Chaser,
    Shooter {
        /// Seconds until the next throw; never negative
        cooldown: f32,
    },
}

/// Which branch of the state machine ran this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Patrol,
    InvestigateAlert,
    InvestigateLastSeen,
    Chase,
    AttackInPlace,
}

/// Shared, read-only inputs for one actor update
#[derive(Debug, Clone, Copy)]
pub struct ActorContext<'a> {
    pub arena: &'a Arena,
    pub tuning: &'a Tuning,
    pub player_pos: Vec2,
}

/// An enemy
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: u32,
    pub variant: Variant,
    pub pos: Vec2,
    /// Facing angle (radians)
    pub facing: f32,
    /// Square body size
    pub size: f32,
    pub base_speed: f32,
    /// Full field of view (degrees)
    pub fov: f32,
    pub vision_radius: f32,
    /// Seconds a global alert must age before this actor reacts to it
    pub response_delay: f32,
    pub waypoint: Option<Vec2>,
    pub last_seen: Option<Vec2>,
    pub search_timer: f32,
    pub stuck_time: f32,
    /// Position at the end of the previous update
    pub settled_pos: Vec2,
    pub sees_player: bool,
    pub mode: Behavior,
    pub anim: u32,
}

impl Actor {
    /// Create an actor with randomized speed, facing and response delay
    pub fn spawn(id: u32, kind: ActorKind, pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let variant = match kind {
            ActorKind::Chaser => Variant::Chaser,
            ActorKind::Shooter => Variant::Shooter { cooldown: 0.0 },
        };
        Self {
            id,
            variant,
            pos,
            facing: rng.random_range(0.0..TAU),
            size: tuning.enemy_size,
            base_speed: rng.random_range(tuning.enemy_speed_min..=tuning.enemy_speed_max),
            fov: tuning.enemy_fov,
            vision_radius: tuning.enemy_vision_radius,
            response_delay: rng.random_range(0.0..=tuning.response_delay_max),
            waypoint: None,
            last_seen: None,
            search_timer: 0.0,
            stuck_time: 0.0,
            settled_pos: pos,
            sees_player: false,
            mode: Behavior::Patrol,
            anim: 0,
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self.variant {
            Variant::Chaser => ActorKind::Chaser,
            Variant::Shooter { .. } => ActorKind::Shooter,
        }
    }

    /// Body box
    #[inline]
    pub fn body(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    /// Killing this actor right now earns the stealth bonus
    #[inline]
    pub fn is_stealth_killable(&self) -> bool {
        !self.sees_player
    }

    /// Range, field-of-view and line-of-sight test against `target`
    pub fn can_see(&self, target: Vec2, obstacles: &[Rect]) -> bool {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > self.vision_radius {
            return false;
        }

        let facing = heading(self.facing);
        let to_target = if dist > 0.0 {
            to_target / dist
        } else {
            Vec2::ZERO
        };
        let dot = facing.dot(to_target).clamp(-1.0, 1.0);
        if dot.acos().to_degrees() > self.fov / 2.0 {
            return false;
        }

        !segment_blocked(self.pos, target, obstacles)
    }

    /// Advance one frame. Returns a projectile if a Shooter threw one.
    pub fn update(
        &mut self,
        ctx: &ActorContext,
        alert: &mut GlobalAlert,
        rng: &mut impl Rng,
        dt: f32,
    ) -> Option<Projectile> {
        if let Variant::Shooter { cooldown } = &mut self.variant {
            *cooldown = (*cooldown - dt).max(0.0);
        }

        let visible = self.can_see(ctx.player_pos, ctx.arena.obstacles());
        self.sees_player = visible;

        let mut thrown = None;
        if visible {
            self.last_seen = Some(ctx.player_pos);
            self.search_timer = 0.0;
            alert.publish(ctx.player_pos);
            thrown = self.engage(ctx, rng, dt);
        } else if let Some(target) = alert.query().actionable(self.response_delay) {
            self.set_mode(Behavior::InvestigateAlert);
            self.investigate(target, ctx, rng, dt);
        } else if let Some(target) = self
            .last_seen
            .filter(|_| self.search_timer < ctx.tuning.search_time)
        {
            self.set_mode(Behavior::InvestigateLastSeen);
            self.investigate(target, ctx, rng, dt);
        } else {
            self.set_mode(Behavior::Patrol);
            self.patrol(ctx, rng, dt);
        }

        self.track_progress(ctx, rng, dt);

        self.anim = if visible {
            (self.anim + 1) % ANIM_FRAMES
        } else {
            0
        };

        thrown
    }

    /// Player in sight: the variant decides
    fn engage(&mut self, ctx: &ActorContext, rng: &mut impl Rng, dt: f32) -> Option<Projectile> {
        let to_player = ctx.player_pos - self.pos;
        let dist = to_player.length();

        match self.variant {
            Variant::Chaser => {
                self.set_mode(Behavior::Chase);
                if dist > 0.0 {
                    let speed = ctx.tuning.chase_speed(self.base_speed);
                    self.move_with_collisions(to_player / dist * speed * dt, ctx, rng);
                    self.facing = angle_of(to_player);
                }
                None
            }
            Variant::Shooter { .. } => {
                // Holds position: never closes distance while the player is visible
                self.set_mode(Behavior::AttackInPlace);
                if dist <= 0.0 {
                    return None;
                }
                self.facing = angle_of(to_player);
                if !self.ready_to_throw(ctx.tuning.shooter_fire_interval) {
                    return None;
                }
                Some(Projectile::new(
                    self.pos,
                    to_player / dist,
                    ProjectileSource::Enemy,
                    ctx.tuning.projectile_size,
                ))
            }
        }
    }

    /// Consume a ready Shooter cooldown, restarting it at `interval`
    fn ready_to_throw(&mut self, interval: f32) -> bool {
        match &mut self.variant {
            Variant::Shooter { cooldown } if *cooldown <= 0.0 => {
                *cooldown = interval;
                true
            }
            _ => false,
        }
    }

    /// Walk toward a reported position; arriving ends the search
    fn investigate(&mut self, target: Vec2, ctx: &ActorContext, rng: &mut impl Rng, dt: f32) {
        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist > 0.0 {
            self.move_with_collisions(to_target / dist * self.base_speed * dt, ctx, rng);
            self.facing = angle_of(to_target);
        }

        let search_time = ctx.tuning.search_time;
        if dist <= ctx.tuning.arrive_distance {
            self.last_seen = None;
            self.search_timer = search_time;
        } else {
            self.search_timer = (self.search_timer + dt).min(search_time);
        }
    }

    fn patrol(&mut self, ctx: &ActorContext, rng: &mut impl Rng, dt: f32) {
        let target = match self.waypoint {
            Some(target) => target,
            None => self.choose_waypoint(ctx.arena, rng),
        };

        let to_target = target - self.pos;
        let dist = to_target.length();
        if dist <= ctx.tuning.arrive_distance {
            self.choose_waypoint(ctx.arena, rng);
        } else {
            self.move_with_collisions(to_target / dist * self.base_speed * dt, ctx, rng);
            self.facing = angle_of(to_target);
        }
    }

    /// Pick a random free waypoint, or a nearby unchecked point if every
    /// sample landed in an obstacle
    pub fn choose_waypoint(&mut self, arena: &Arena, rng: &mut impl Rng) -> Vec2 {
        for _ in 0..WAYPOINT_ATTEMPTS {
            let candidate = arena.random_point(rng, WAYPOINT_MARGIN);
            if !arena.is_blocked(&Rect::square(candidate, WAYPOINT_PROBE)) {
                self.waypoint = Some(candidate);
                return candidate;
            }
        }

        let target = self.pos
            + Vec2::new(
                rng.random_range(-WAYPOINT_FALLBACK..=WAYPOINT_FALLBACK) as f32,
                rng.random_range(-WAYPOINT_FALLBACK..=WAYPOINT_FALLBACK) as f32,
            );
        self.waypoint = Some(target);
        target
    }

    /// Axis-sliding move that also keeps the body center on screen. A move
    /// with no accepted axis turns the actor and nudges it forward instead.
    /// Returns whether any axis was accepted.
    pub fn move_with_collisions(&mut self, desired: Vec2, ctx: &ActorContext, rng: &mut impl Rng) -> bool {
        let arena = ctx.arena;
        let mut res = resolve_axes(&self.body(), desired, arena.obstacles());
        res.x_clear &= arena.in_bounds(Vec2::new(self.pos.x + desired.x, self.pos.y));
        res.y_clear &= arena.in_bounds(Vec2::new(self.pos.x, self.pos.y + desired.y));

        if res.fully_blocked() {
            let turn = (120.0 + rng.random_range(-30.0..=30.0f32)).to_radians();
            self.facing = normalize_angle(self.facing + turn);
            self.pos += heading(self.facing) * ctx.tuning.blocked_nudge;
            self.pos = arena.clamp(self.pos, self.size / 2.0 + WALL_THICKNESS);
            return false;
        }

        if res.x_clear {
            self.pos.x += desired.x;
        }
        if res.y_clear {
            self.pos.y += desired.y;
        }
        true
    }

    /// Stuck detection: too little movement for too long forces a new waypoint,
    /// whatever the current behavior
    fn track_progress(&mut self, ctx: &ActorContext, rng: &mut impl Rng, dt: f32) {
        if self.pos.distance(self.settled_pos) < ctx.tuning.stuck_distance {
            self.stuck_time += dt;
        } else {
            self.stuck_time = 0.0;
        }
        if self.stuck_time > ctx.tuning.stuck_time {
            self.choose_waypoint(ctx.arena, rng);
            self.stuck_time = 0.0;
            log::debug!("Actor {} stuck at {:?}, new waypoint {:?}", self.id, self.pos, self.waypoint);
        }
        self.settled_pos = self.pos;
    }

    fn set_mode(&mut self, mode: Behavior) {
        if self.mode != mode {
            log::debug!("Actor {} {:?} -> {:?}", self.id, self.mode, mode);
            self.mode = mode;
        }
    }
}
