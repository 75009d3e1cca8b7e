//! Fixed timestep simulation tick
//!
//! One call advances the run by one frame. The order of the steps is
//! load-bearing:
//! 1. age the global alert
//! 2. player movement, aim, katana sweep and throws
//! 3. melee hits
//! 4. advance and cull projectiles
//! 5. projectile hits against enemies and the player
//! 6. enemy updates, in collection order
//! 7. game over checks
//! 8. wave clear and the next spawn

use glam::Vec2;

use super::actor::{ActorContext, ActorKind};
use super::collision::resolve_axis_movement;
use super::combat::{
    Kill, Projectile, ProjectileSource, advance_projectiles, resolve_melee, resolve_projectile_hits,
};
use super::state::{GameEvent, GameOverCause, GamePhase, GameState};
use crate::angle_of;
use crate::consts::ANIM_FRAMES;
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent, each axis in [-1, 1]
    pub move_axis: Vec2,
    /// Aim target point
    pub aim: Vec2,
    /// Katana held
    pub melee: bool,
    /// Throw requested
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    state.alert.tick(dt);

    update_player(state, input, dt);

    if state.player.katana.active {
        let hit_box = state
            .player
            .katana
            .hit_box(state.player.pos, state.player.facing, &state.tuning);
        let kills = resolve_melee(&hit_box, &mut state.actors, &state.tuning);
        record_kills(state, &kills);
    }

    advance_projectiles(
        &mut state.projectiles,
        &state.arena,
        state.tuning.projectile_speed,
        dt,
    );

    let player_body = state.player.body(&state.tuning);
    let report = resolve_projectile_hits(
        &mut state.projectiles,
        &mut state.actors,
        &player_body,
        &state.tuning,
    );
    record_kills(state, &report.kills);

    let ctx = ActorContext {
        arena: &state.arena,
        tuning: &state.tuning,
        player_pos: state.player.pos,
    };
    let mut thrown = Vec::new();
    for actor in state.actors.iter_mut() {
        if let Some(p) = actor.update(&ctx, &mut state.alert, &mut state.rng, dt) {
            thrown.push(p);
        }
    }
    for p in thrown {
        state.projectiles.push(p);
        state.events.push(GameEvent::ProjectileLaunched {
            source: ProjectileSource::Enemy,
        });
    }

    if report.player_hit {
        game_over(state, GameOverCause::EnemyProjectile);
    } else if state.actors.iter().any(|a| a.body().overlaps(&player_body)) {
        game_over(state, GameOverCause::EnemyContact);
    }

    if state.phase == GamePhase::Playing && state.actors.is_empty() {
        advance_wave(state);
    }
}

/// Movement, aim, katana sweep and throwing
fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let tuning = &state.tuning;
    let player = &mut state.player;

    let axis = input.move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
    let desired = axis * tuning.player_speed * dt;
    let delta = resolve_axis_movement(&player.body(tuning), desired, state.arena.obstacles());
    player.pos = state.arena.clamp(
        player.pos + delta,
        tuning.player_radius + tuning.player_edge_margin,
    );

    let to_aim = input.aim - player.pos;
    if to_aim != Vec2::ZERO {
        player.facing = angle_of(to_aim);
    }

    player.katana.update(input.melee, dt, tuning);
    player.anim = if player.katana.active {
        (player.anim + 1) % ANIM_FRAMES
    } else {
        0
    };

    if player.fire_cooldown > 0.0 {
        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    }
    if input.fire && player.fire_cooldown <= 0.0 {
        let dir = to_aim / to_aim.length().max(1.0);
        state.projectiles.push(Projectile::new(
            player.pos,
            dir,
            ProjectileSource::Player,
            tuning.projectile_size,
        ));
        player.fire_cooldown = tuning.fire_cooldown;
        state.events.push(GameEvent::ProjectileLaunched {
            source: ProjectileSource::Player,
        });
    }
}

fn record_kills(state: &mut GameState, kills: &[Kill]) {
    for kill in kills {
        state.score += kill.points;
        log::debug!(
            "{:?} {} killed by {:?} for {} points{}",
            kill.kind,
            kill.actor_id,
            kill.by,
            kill.points,
            if kill.stealth { " (stealth)" } else { "" }
        );
        state.events.push(GameEvent::EnemyKilled {
            kind: kill.kind,
            points: kill.points,
            stealth: kill.stealth,
            by: kill.by,
        });
    }
}

fn game_over(state: &mut GameState, cause: GameOverCause) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.player.alive = false;
    state.player.katana.active = false;
    log::info!(
        "Game over ({cause:?}) on wave {} with score {}",
        state.wave,
        state.score
    );
    state.events.push(GameEvent::GameOver { cause });
}

/// Wave cleared: bump the counter and spawn the next batch
fn advance_wave(state: &mut GameState) {
    let cleared = state.wave;
    state.wave += 1;
    state.events.push(GameEvent::WaveCleared { wave: cleared });
    if state.wave == state.tuning.music_level_two_wave {
        state.events.push(GameEvent::MusicLevel(2));
    }
    spawn_wave(state);
    log::info!(
        "Wave {cleared} cleared, wave {} spawns {} enemies",
        state.wave,
        state.actors.len()
    );
}

/// Chasers spawned when wave `wave` starts
pub fn normal_spawn_count(wave: u32, tuning: &Tuning) -> u32 {
    (2 + wave).min(tuning.max_chasers_per_wave)
}

/// Shooters spawned when wave `wave` starts
pub fn ranged_spawn_count(wave: u32, tuning: &Tuning) -> u32 {
    if wave < tuning.shooter_first_wave {
        return 0;
    }
    (wave + 1 - tuning.shooter_first_wave).min(tuning.max_shooters_per_wave)
}

/// Spawn the enemies for the current wave
pub fn spawn_wave(state: &mut GameState) {
    let wave = state.wave;
    let chasers = normal_spawn_count(wave, &state.tuning);
    let shooters = ranged_spawn_count(wave, &state.tuning);
    let chaser_dist = state.tuning.chaser_spawn_distance;
    let shooter_dist = state.tuning.shooter_spawn_distance;

    for _ in 0..chasers {
        state.spawn_actor(ActorKind::Chaser, chaser_dist);
    }
    for _ in 0..shooters {
        state.spawn_actor(ActorKind::Shooter, shooter_dist);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::actor::Actor;
    use crate::sim::arena::Arena;
    use crate::sim::combat::KillMethod;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// A state whose enemies are parked where they cannot reach the player
    fn quiet_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        for (i, actor) in state.actors.iter_mut().enumerate() {
            actor.pos = Vec2::new(100.0 + i as f32 * 60.0, 500.0);
            actor.base_speed = 0.0;
            actor.response_delay = 100.0;
        }
        state
    }

    fn idle_aim(state: &GameState) -> TickInput {
        TickInput {
            aim: state.player.pos + Vec2::X,
            ..Default::default()
        }
    }

    #[test]
    fn test_spawn_counts() {
        let tuning = Tuning::default();
        assert_eq!(normal_spawn_count(2, &tuning), 4);
        assert_eq!(ranged_spawn_count(2, &tuning), 0);
        assert_eq!(ranged_spawn_count(3, &tuning), 1);
        assert_eq!(normal_spawn_count(5, &tuning), 7);
        assert_eq!(ranged_spawn_count(5, &tuning), 3);
        assert_eq!(normal_spawn_count(12, &tuning), 10);
        assert_eq!(ranged_spawn_count(12, &tuning), 5);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = quiet_state(12345);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing advances while paused
        state.alert.publish(Vec2::ZERO);
        let ticks = state.time_ticks;
        let idle = idle_aim(&state);
        tick(&mut state, &idle, SIM_DT);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.alert.query().age, 0.0);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_player_moves_and_stays_in_bounds() {
        let mut state = quiet_state(1);
        let input = TickInput {
            move_axis: Vec2::new(5.0, 0.0),
            aim: Vec2::new(800.0, 300.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        // Axis input is clamped to 1
        assert!((state.player.pos.x - (400.0 + 300.0 * SIM_DT)).abs() < 1e-3);

        for _ in 0..200 {
            tick(&mut state, &input, SIM_DT);
        }
        let margin = state.tuning.player_radius + state.tuning.player_edge_margin;
        assert!(state.player.pos.x <= 800.0 - margin);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = quiet_state(2);
        let input = TickInput {
            aim: Vec2::new(400.0, 250.0),
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        let launched = state
            .drain_events()
            .iter()
            .filter(|e| {
                matches!(e, GameEvent::ProjectileLaunched { source: ProjectileSource::Player })
            })
            .count();
        assert_eq!(launched, 1);
        assert!(state.player.fire_cooldown > 0.0);
        assert!(state.player.fire_cooldown <= state.tuning.fire_cooldown);
    }

    #[test]
    fn test_killing_initial_wave_advances_to_wave_two() {
        let mut state = quiet_state(3);
        assert_eq!(state.actors.len(), 3);
        assert_eq!(state.wave, 1);
        assert_eq!(state.score, 0);

        // Put every enemy on the katana's tip, unaware of the player
        let tip = state.player.pos + Vec2::new(state.tuning.katana_reach, 0.0);
        for actor in state.actors.iter_mut() {
            actor.pos = tip;
            actor.facing = 0.0;
        }
        let input = TickInput {
            aim: state.player.pos + Vec2::X * 100.0,
            melee: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        assert_eq!(state.score, 3 * 20);
        assert_eq!(state.wave, 2);
        assert_eq!(state.actors.len(), 4);
        assert!(state.actors.iter().all(|a| a.kind() == ActorKind::Chaser));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::WaveCleared { wave: 1 }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemyKilled { by: KillMethod::Katana, .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_projectile_into_obstacle_scores_nothing() {
        let mut state = quiet_state(4);
        // Right next to the upper-left pillar (x 170..204, y 170..270)
        state.player.pos = Vec2::new(150.0, 220.0);
        let input = TickInput {
            aim: Vec2::new(300.0, 220.0),
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        let hold = TickInput {
            fire: false,
            ..input
        };
        tick(&mut state, &hold, SIM_DT);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.actors.len(), 3);
    }

    #[test]
    fn test_body_contact_is_game_over_once() {
        let mut state = quiet_state(5);
        state.actors[0].pos = state.player.pos + Vec2::new(20.0, 0.0);
        let idle = idle_aim(&state);
        tick(&mut state, &idle, SIM_DT);
        assert!(state.is_game_over());
        assert!(!state.player.alive);

        tick(&mut state, &idle, SIM_DT);
        let overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_enemy_projectile_ends_the_run() {
        let mut state = quiet_state(6);
        let dir = Vec2::NEG_X;
        state.projectiles.push(Projectile::new(
            state.player.pos + Vec2::new(20.0, 0.0),
            dir,
            ProjectileSource::Enemy,
            16.0,
        ));
        let idle = idle_aim(&state);
        tick(&mut state, &idle, SIM_DT);
        assert!(state.is_game_over());
        assert!(state.projectiles.is_empty());
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            cause: GameOverCause::EnemyProjectile
        }));
    }

    #[test]
    fn test_music_switches_on_wave_seven() {
        let mut state = GameState::bare(7, Tuning::default(), Arena::standard());
        state.wave = 6;
        let idle = idle_aim(&state);
        tick(&mut state, &idle, SIM_DT);
        assert_eq!(state.wave, 7);
        assert_eq!(state.music_level(), 2);
        assert!(state.drain_events().contains(&GameEvent::MusicLevel(2)));
        assert_eq!(state.actors.len(), 9 + 5);
    }

    #[test]
    fn test_alert_reaches_later_actor_same_frame() {
        let mut state = GameState::bare(8, Tuning::default(), Arena::empty(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(8);
        let player = state.player.pos;
        // Watcher updates first, the blind actor right after it
        let mut watcher = Actor::spawn(1, ActorKind::Shooter, player + Vec2::new(150.0, 0.0), &state.tuning, &mut rng);
        watcher.facing = std::f32::consts::PI;
        let mut blind = Actor::spawn(2, ActorKind::Shooter, player + Vec2::new(-150.0, 0.0), &state.tuning, &mut rng);
        blind.facing = std::f32::consts::PI;
        blind.response_delay = 0.0;
        blind.waypoint = Some(blind.pos + Vec2::new(-200.0, 0.0));
        state.actors = vec![watcher, blind];
        let idle = idle_aim(&state);

        tick(&mut state, &idle, SIM_DT);
        assert!(state.alert.query().active);
        assert_eq!(
            state.actors[0].mode,
            crate::sim::actor::Behavior::AttackInPlace
        );
        assert_eq!(
            state.actors[1].mode,
            crate::sim::actor::Behavior::InvestigateAlert
        );
    }

    #[test]
    fn test_alert_missed_by_earlier_actor_same_frame() {
        let mut state = GameState::bare(8, Tuning::default(), Arena::empty(800.0, 600.0));
        let mut rng = Pcg32::seed_from_u64(8);
        let player = state.player.pos;
        // First actor faces away, second sees the player
        let mut blind = Actor::spawn(1, ActorKind::Shooter, player + Vec2::new(-150.0, 0.0), &state.tuning, &mut rng);
        blind.facing = std::f32::consts::PI;
        blind.response_delay = 0.0;
        // Walking further away keeps it facing away
        blind.waypoint = Some(blind.pos + Vec2::new(-200.0, 0.0));
        let mut watcher = Actor::spawn(2, ActorKind::Shooter, player + Vec2::new(150.0, 0.0), &state.tuning, &mut rng);
        watcher.facing = std::f32::consts::PI;
        state.actors = vec![blind, watcher];
        let idle = idle_aim(&state);

        tick(&mut state, &idle, SIM_DT);
        assert_eq!(state.actors[0].mode, crate::sim::actor::Behavior::Patrol);
        assert!(state.alert.query().active);

        tick(&mut state, &idle, SIM_DT);
        assert_eq!(
            state.actors[0].mode,
            crate::sim::actor::Behavior::InvestigateAlert
        );
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let inputs = [
            TickInput {
                move_axis: Vec2::new(1.0, 0.0),
                aim: Vec2::new(600.0, 300.0),
                ..Default::default()
            },
            TickInput {
                aim: Vec2::new(100.0, 100.0),
                fire: true,
                ..Default::default()
            },
            TickInput {
                move_axis: Vec2::new(0.0, -1.0),
                melee: true,
                ..Default::default()
            },
        ];
        for _ in 0..40 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }
        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        let p1: Vec<Vec2> = state1.actors.iter().map(|a| a.pos).collect();
        let p2: Vec<Vec2> = state2.actors.iter().map(|a| a.pos).collect();
        assert_eq!(p1, p2);
    }
}
