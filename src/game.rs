//! Game host
//!
//! Drives a `GameSession` with a fixed-timestep accumulator and keeps the
//! leaderboard in sync with the score store. A finished run with a positive
//! score is persisted as soon as the session reports game over.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{HighScores, ScoreStore};
use crate::settings::{Settings, SettingsError};
use crate::sim::state::{GameEvent, GamePhase, GameSession};
use crate::sim::tick::{TickInput, tick};

pub struct Game {
    session: GameSession,
    store: Box<dyn ScoreStore>,
    high_scores: HighScores,
    accumulator: f32,
    /// Rank of the last persisted score, if it made the table
    last_rank: Option<usize>,
}

impl Game {
    /// New host on the title screen. Loads the leaderboard once.
    ///
    /// Fails if `settings` do not pass `Settings::validate`.
    pub fn new(
        settings: Settings,
        store: Box<dyn ScoreStore>,
        seed: u64,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        log::info!(
            "New game (seed {seed}, {}x{}, difficulty {} +{})",
            settings.screen_width,
            settings.screen_height,
            settings.difficulty.as_str(),
            settings.difficulty_step
        );
        let high_scores = store.load();
        Ok(Self {
            session: GameSession::new(settings, seed),
            store,
            high_scores,
            accumulator: 0.0,
            last_rank: None,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// False once Quit was chosen
    pub fn is_running(&self) -> bool {
        self.session.phase != GamePhase::Terminated
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Positive score at least as good as the best on the table
    pub fn is_new_high_score(&self, score: u32) -> bool {
        score > 0 && self.high_scores.top_score().is_none_or(|top| score >= top)
    }

    /// Run exactly one tick. Returns the events it produced.
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.session, input, SIM_DT);
        let mut events = self.session.drain_events();

        let finished = events.iter().find_map(|e| match e {
            GameEvent::GameOver { score, .. } => Some(*score),
            _ => None,
        });
        if let Some(score) = finished {
            if let Some(event) = self.record_score(score) {
                events.push(event);
            }
        }
        events
    }

    /// Advance by wall-clock `dt` seconds in fixed substeps.
    ///
    /// Held intents apply to every substep; one-shot commands (fire, menu)
    /// only to the first.
    pub fn update(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator += dt.min(0.1);

        let mut events = Vec::new();
        let mut current = *input;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step(&current));
            self.accumulator -= SIM_DT;
            substeps += 1;

            current.fire = false;
            current.play = false;
            current.high_scores = false;
            current.back = false;
            current.quit = false;
            current.click = None;
        }
        events
    }

    fn record_score(&mut self, score: u32) -> Option<GameEvent> {
        if score == 0 {
            log::info!("Run ended without points; nothing to record");
            return None;
        }
        let rank = self.high_scores.potential_rank(score);
        self.high_scores = self.store.save_score(score);
        self.last_rank = rank;
        rank.map(|rank| GameEvent::HighScore { score, rank })
    }
}
