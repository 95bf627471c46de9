//! Alien Invasion entry point
//!
//! Headless attract-mode demo: the autopilot plays one game on the fixed
//! timestep loop, the score is recorded, and the leaderboard is logged.

use std::time::{SystemTime, UNIX_EPOCH};

use alien_invasion::audio::{AudioManager, LogSink};
use alien_invasion::autopilot::Autopilot;
use alien_invasion::consts::{HIGH_SCORE_FILE, SIM_DT};
use alien_invasion::sim::GameEvent;
use alien_invasion::{FileScoreStore, Game, MemoryScoreStore, ScoreStore, Settings};

/// Simulated seconds before the demo gives up
const DEMO_LIMIT_SECS: f32 = 300.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Alien Invasion (headless demo) starting...");

    let settings = Settings::load(Settings::FILE_NAME);
    let mut audio = AudioManager::new(LogSink);
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);

    let store: Box<dyn ScoreStore> = match FileScoreStore::open(".") {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{HIGH_SCORE_FILE} unavailable ({e}); scores will not be kept");
            Box::new(MemoryScoreStore::new())
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let mut game = match Game::new(settings, store, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            std::process::exit(1);
        }
    };
    audio.start_music("background_music.mp3");
    let mut pilot = Autopilot::default().with_runs(1);

    let frames = (DEMO_LIMIT_SECS / SIM_DT) as u32;
    for _ in 0..frames {
        if !game.is_running() {
            break;
        }
        let input = pilot.next_input(game.session());
        let events = game.update(SIM_DT, &input);
        audio.play_events(&events);

        for event in &events {
            match event {
                GameEvent::WaveCleared { wave } => log::info!("Reached wave {wave}"),
                GameEvent::ShipHit { ships_left } => log::info!("Ship down, {ships_left} left"),
                GameEvent::HighScore { score, rank } => {
                    log::info!("New high score {score} (rank {rank})")
                }
                _ => {}
            }
        }
    }
    audio.stop_music();

    let stats = game.session().stats;
    if game.is_running() {
        log::info!("Demo time limit reached");
    }
    log::info!("Final score {} on wave {}", stats.score, stats.wave);
    for (i, score) in game.high_scores().scores().iter().enumerate() {
        log::info!("{:>2}. {score}", i + 1);
    }
}
