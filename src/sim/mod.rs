//! Frame-stepped simulation
//!
//! All gameplay logic lives here. This module stays free of platform code:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering, audio or storage dependencies

pub mod actor;
pub mod alert;
pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod combat;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use actor::{Actor, ActorContext, ActorKind, Behavior, Variant};
pub use alert::{AlertReading, GlobalAlert};
pub use arena::Arena;
pub use collision::{resolve_axis_movement, segment_intersects_rect, segments_intersect};
pub use combat::{Katana, Kill, KillMethod, Projectile, ProjectileSource};
pub use rect::Rect;
pub use state::{GameEvent, GameOverCause, GamePhase, GameState, Player};
pub use tick::{TickInput, normal_spawn_count, ranged_spawn_count, spawn_wave, tick};
pub use view::RenderView;
