//! Ninja Fate - headless runner
//!
//! Plays one run with the demo autopilot at a fixed 60 Hz step, records the
//! score and prints the leaderboard.
//!
//! ```text
//! ninja-fate [--name NAME] [--seed N] [--frames N] [--store PATH] [--tuning PATH] [--view]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use ninja_fate::Tuning;
    use ninja_fate::consts::SIM_DT;
    use ninja_fate::persistence::{Gateway, JsonFileStore};
    use ninja_fate::platform::FixedStep;
    use ninja_fate::session::Session;
    use ninja_fate::sim::{GameEvent, autopilot};

    /// Default run length: five minutes of play
    const DEFAULT_FRAMES: u64 = 60 * 60 * 5;

    #[derive(Parser, Debug)]
    #[command(author, version, about)]
    struct Cli {
        /// Name recorded on the leaderboard
        #[arg(long, default_value = "autopilot")]
        name: String,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Frames to simulate before stopping
        #[arg(long, default_value_t = DEFAULT_FRAMES)]
        frames: u64,
        /// JSON file holding settings and high scores
        #[arg(long, default_value = "ninja-fate.json")]
        store: PathBuf,
        /// Optional tuning overrides
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Print the final frame view as JSON
        #[arg(long)]
        view: bool,
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let args = Cli::parse();
        log::info!("Ninja Fate (headless) starting: {args:?}");

        let tuning = args
            .tuning
            .as_deref()
            .map(Tuning::load_or_default)
            .unwrap_or_default();
        let store = JsonFileStore::open(&args.store);
        log::info!("Settings and scores in {}", store.path().display());
        let gateway = Gateway::new(store);
        let mut session = Session::new(&args.name, args.seed, gateway, tuning);
        let mut clock = FixedStep::default();

        let mut frame = 0;
        'run: while frame < args.frames {
            for _ in 0..clock.advance(SIM_DT) {
                let input = autopilot::drive(session.state());
                for event in session.step(&input) {
                    report(&event);
                }
                frame += 1;
                if session.is_game_over() || frame >= args.frames {
                    break 'run;
                }
            }
        }

        let state = session.state();
        println!(
            "{} after {} frames: wave {}, score {}",
            if state.is_game_over() { "Game over" } else { "Time up" },
            state.time_ticks,
            state.wave,
            state.score
        );
        if let Some(rank) = session.last_rank() {
            println!("New high score, rank #{rank}");
        }

        if args.view {
            match serde_json::to_string_pretty(&session.view()) {
                Ok(json) => println!("{json}"),
                Err(e) => log::warn!("Cannot serialize frame view: {e}"),
            }
        }

        println!("\nLeaderboard");
        for (i, entry) in session.leaderboard(None).iter().enumerate() {
            println!("{:>2}. {:<16} {:>8}", i + 1, entry.name, entry.score);
        }
        ExitCode::SUCCESS
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::WaveCleared { wave } => log::info!("Wave {wave} cleared"),
            GameEvent::MusicLevel(level) => log::info!("Music level {level}"),
            GameEvent::EnemyKilled {
                kind,
                points,
                stealth: true,
                ..
            } => log::info!("Stealth kill: {kind:?} +{points}"),
            other => log::debug!("{other:?}"),
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}
