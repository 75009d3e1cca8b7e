//! Game lifecycle around the simulation
//!
//! A session owns one run at a time plus the persistence gateway. It saves
//! the score exactly once when a run ends and can restart with the same
//! player name.

use crate::consts::SIM_DT;
use crate::highscores::{HighScoreEntry, sanitize_name};
use crate::persistence::{Gateway, Persistence};
use crate::sim::{GameEvent, GameState, RenderView, TickInput, tick};
use crate::tuning::Tuning;

/// Leaderboard rows shown by default
pub const DEFAULT_LEADERBOARD: usize = 5;

pub struct Session<P: Persistence> {
    state: GameState,
    gateway: Gateway<P>,
    tuning: Tuning,
    player_name: String,
    seed: u64,
    restarts: u64,
    score_saved: bool,
    /// Rank the last finished run earned, if any
    last_rank: Option<usize>,
}

impl<P: Persistence> Session<P> {
    pub fn new(name: &str, seed: u64, mut gateway: Gateway<P>, tuning: Tuning) -> Self {
        let player_name = sanitize_name(name).unwrap_or_default();
        if !player_name.is_empty() && gateway.settings().player_name != player_name {
            let stored = player_name.clone();
            gateway.update_settings(|s| s.player_name = stored);
        }
        log::info!("Session for {player_name:?} (seed {seed})");

        Self {
            state: GameState::with_tuning(seed, tuning.clone()),
            gateway,
            tuning,
            player_name,
            seed,
            restarts: 0,
            score_saved: false,
            last_rank: None,
        }
    }

    /// Run one simulation frame and return its events
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input, SIM_DT);

        if self.state.is_game_over() && !self.score_saved {
            self.score_saved = true;
            self.last_rank = self
                .gateway
                .record_score(&self.player_name, self.state.score);
        }

        self.state.drain_events()
    }

    /// Start a new run for the same player
    pub fn restart(&mut self) {
        self.restarts += 1;
        let seed = self.seed.wrapping_add(self.restarts);
        self.state = GameState::with_tuning(seed, self.tuning.clone());
        self.score_saved = false;
        self.last_rank = None;
        log::info!("Restarted run for {:?}", self.player_name);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn leaderboard(&self, limit: Option<usize>) -> &[HighScoreEntry] {
        self.gateway
            .top_scores(limit.unwrap_or(DEFAULT_LEADERBOARD))
    }

    pub fn volume(&self) -> f32 {
        self.gateway.volume()
    }

    pub fn volume_up(&mut self) -> f32 {
        self.gateway.volume_up()
    }

    pub fn volume_down(&mut self) -> f32 {
        self.gateway.volume_down()
    }

    pub fn gateway(&self) -> &Gateway<P> {
        &self.gateway
    }

    /// Frame view with the player's display settings applied
    pub fn view(&self) -> RenderView {
        RenderView::capture(&self.state)
            .with_vision_cones(self.gateway.settings().show_vision_cones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::settings::Settings;
    use glam::Vec2;

    /// Counts score writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        score_saves: usize,
    }

    impl Persistence for CountingStore {
        fn load_settings(&self) -> Result<Settings, StoreError> {
            self.inner.load_settings()
        }
        fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
            self.inner.save_settings(settings)
        }
        fn load_scores(&self) -> Result<HighScores, StoreError> {
            self.inner.load_scores()
        }
        fn save_scores(&mut self, scores: &HighScores) -> Result<(), StoreError> {
            self.score_saves += 1;
            self.inner.save_scores(scores)
        }
    }

    fn session(name: &str) -> Session<CountingStore> {
        Session::new(
            name,
            11,
            Gateway::new(CountingStore::default()),
            Tuning::default(),
        )
    }

    /// Drop an enemy onto the player so the next frame ends the run
    fn force_contact(session: &mut Session<CountingStore>) {
        let state = session.state_mut();
        let pos = state.player.pos;
        state.actors[0].pos = pos + Vec2::new(10.0, 0.0);
        state.score = 70;
    }

    #[test]
    fn test_game_over_persists_exactly_once() {
        let mut s = session("kaede");
        force_contact(&mut s);
        let events = s.step(&TickInput::default());
        assert!(s.is_game_over());
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        for _ in 0..30 {
            s.step(&TickInput::default());
        }
        assert_eq!(s.gateway().store().score_saves, 1);
        assert_eq!(s.last_rank(), Some(1));
        assert_eq!(s.leaderboard(None)[0].score, 70);
        assert_eq!(s.leaderboard(None)[0].name, "kaede");
    }

    #[test]
    fn test_restart_keeps_name_and_rearms_save() {
        let mut s = session("  jin ");
        assert_eq!(s.player_name(), "jin");
        force_contact(&mut s);
        s.step(&TickInput::default());

        s.restart();
        assert!(!s.is_game_over());
        assert_eq!(s.state().wave, 1);
        assert_eq!(s.state().score, 0);
        assert_eq!(s.state().actors.len(), 3);
        assert_eq!(s.player_name(), "jin");

        force_contact(&mut s);
        s.step(&TickInput::default());
        assert_eq!(s.gateway().store().score_saves, 2);
        assert_eq!(s.leaderboard(Some(10)).len(), 2);
    }

    #[test]
    fn test_unnamed_run_is_not_recorded() {
        let mut s = session("   ");
        force_contact(&mut s);
        s.step(&TickInput::default());
        assert!(s.is_game_over());
        assert_eq!(s.gateway().store().score_saves, 0);
        assert!(s.leaderboard(None).is_empty());
    }

    #[test]
    fn test_name_remembered_in_settings() {
        let s = session("mika");
        assert_eq!(s.gateway().settings().player_name, "mika");
    }

    #[test]
    fn test_volume_helpers() {
        let mut s = session("x");
        assert_eq!(s.volume_down(), 0.95);
        assert_eq!(s.volume_up(), 1.0);
        assert_eq!(s.volume(), 1.0);
    }

    #[test]
    fn test_view_follows_vision_cone_setting() {
        let mut store = CountingStore::default();
        store
            .inner
            .save_settings(&Settings {
                show_vision_cones: true,
                ..Settings::default()
            })
            .unwrap();
        let s = Session::new("aoi", 3, Gateway::new(store), Tuning::default());
        let view = s.view();
        assert!(view.show_vision_cones);
        assert_eq!(view.actors.len(), 3);

        assert!(!session("ren").view().show_vision_cones);
    }
}
