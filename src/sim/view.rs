//! Read-only frame view handed to presentation
//!
//! Rendering is out of the simulation's hands; a host turns this into
//! sprites (or, headless, into JSON).

use glam::Vec2;
use serde::Serialize;

use super::actor::{ActorKind, Behavior};
use super::combat::ProjectileSource;
use super::rect::Rect;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing: f32,
    /// Katana sweep offset (degrees)
    pub sweep: f32,
    /// Blade tip while the katana is out
    pub katana_point: Option<Vec2>,
    pub anim: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorView {
    pub id: u32,
    pub pos: Vec2,
    pub facing: f32,
    pub kind: ActorKind,
    pub mode: Behavior,
    pub sees_player: bool,
    /// Full field of view (degrees), for the vision cone overlay
    pub fov: f32,
    pub vision_radius: f32,
    pub anim: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub rect: Rect,
    pub source: ProjectileSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    pub wave: u32,
    pub score: u64,
    pub phase: GamePhase,
    pub music_level: u8,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderView {
    pub player: PlayerView,
    pub actors: Vec<ActorView>,
    pub projectiles: Vec<ProjectileView>,
    pub obstacles: Vec<Rect>,
    pub hud: Hud,
    /// Draw each actor's field of view
    pub show_vision_cones: bool,
}

impl RenderView {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let katana_point = player
            .katana
            .active
            .then(|| player.katana.hit_point(player.pos, player.facing, &state.tuning));

        Self {
            player: PlayerView {
                pos: player.pos,
                facing: player.facing,
                sweep: player.katana.sweep,
                katana_point,
                anim: player.anim,
            },
            actors: state
                .actors
                .iter()
                .map(|a| ActorView {
                    id: a.id,
                    pos: a.pos,
                    facing: a.facing,
                    kind: a.kind(),
                    mode: a.mode,
                    sees_player: a.sees_player,
                    fov: a.fov,
                    vision_radius: a.vision_radius,
                    anim: a.anim,
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    rect: p.rect,
                    source: p.source,
                })
                .collect(),
            obstacles: state.arena.obstacles().to_vec(),
            hud: Hud {
                wave: state.wave,
                score: state.score,
                phase: state.phase,
                music_level: state.music_level(),
            },
            show_vision_cones: false,
        }
    }

    pub fn with_vision_cones(mut self, show: bool) -> Self {
        self.show_vision_cones = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_capture_initial() {
        let state = GameState::new(5);
        let view = RenderView::capture(&state);
        assert_eq!(view.actors.len(), 3);
        assert_eq!(view.hud.wave, 1);
        assert_eq!(view.hud.score, 0);
        assert_eq!(view.obstacles.len(), 8);
        assert!(view.player.katana_point.is_none());
        assert!(!view.show_vision_cones);
        assert!(view.with_vision_cones(true).show_vision_cones);
    }

    #[test]
    fn test_katana_point_while_swinging() {
        let mut state = GameState::new(5);
        let input = TickInput {
            aim: Vec2::new(400.0, 100.0),
            melee: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let view = RenderView::capture(&state);
        let tip = view.player.katana_point.map(|p| p.distance(view.player.pos));
        assert!(tip.is_some_and(|d| (d - 35.0).abs() < 1e-3));
        assert_eq!(view.player.anim, 1);
    }

    #[test]
    fn test_serializes_to_json() {
        let state = GameState::new(9);
        let json = serde_json::to_string(&RenderView::capture(&state));
        assert!(json.is_ok_and(|s| s.contains("\"hud\"")));
    }
}
