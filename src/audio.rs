//! Sound cues driven by game events
//!
//! The simulation never plays audio. Events drained after each tick are
//! mapped to `SoundEffect`s and handed to a worker thread that owns the
//! actual output (`AudioSink`). Sending never blocks, and a dead worker
//! only silences the game.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use crate::sim::state::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player bullet fired
    Shoot,
    /// Alien bullet fired
    AlienShoot,
    /// Alien destroyed
    Explosion,
    /// Ship lost
    ShipHit,
    /// Fleet cleared
    WaveClear,
    /// Run started
    Start,
    /// Last ship lost
    GameOver,
    /// Score made the leaderboard
    HighScore,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerFired => Some(Self::Shoot),
            GameEvent::AlienFired => Some(Self::AlienShoot),
            GameEvent::AlienDestroyed { .. } => Some(Self::Explosion),
            GameEvent::ShipHit { ships_left } if *ships_left > 0 => Some(Self::ShipHit),
            GameEvent::ShipHit { .. } => None,
            GameEvent::WaveCleared { .. } => Some(Self::WaveClear),
            GameEvent::GameOver { .. } => Some(Self::GameOver),
            GameEvent::HighScore { .. } => Some(Self::HighScore),
            GameEvent::PhaseChanged {
                to: GamePhase::Playing,
                ..
            } => Some(Self::Start),
            GameEvent::PhaseChanged { .. } => None,
        }
    }
}

/// Whatever actually makes the noise. Runs on the audio worker thread.
pub trait AudioSink: Send + 'static {
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start looping a background track. Silent by default.
    fn play_music(&mut self, _track: &str, _volume: f32) {}

    fn stop_music(&mut self) {}
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {effect:?} at {volume:.2}");
    }

    fn play_music(&mut self, track: &str, volume: f32) {
        log::debug!("music {track} at {volume:.2}");
    }
}

enum AudioCommand {
    Effect(SoundEffect, f32),
    Music(String, f32),
    StopMusic,
}

/// Audio front end owned by the game loop
pub struct AudioManager {
    tx: Option<Sender<AudioCommand>>,
    worker: Option<JoinHandle<()>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    /// Spawn the worker thread around `sink`
    pub fn new(mut sink: impl AudioSink) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let worker = thread::Builder::new()
            .name("audio".into())
            .spawn(move || {
                for command in rx {
                    match command {
                        AudioCommand::Effect(effect, volume) => sink.play(effect, volume),
                        AudioCommand::Music(track, volume) => sink.play_music(&track, volume),
                        AudioCommand::StopMusic => sink.stop_music(),
                    }
                }
            });

        let (tx, worker) = match worker {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                log::warn!("Failed to start audio thread - audio disabled: {e}");
                (None, None)
            }
        };

        Self {
            tx,
            worker,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with no output at all
    pub fn disabled() -> Self {
        Self {
            tx: None,
            worker: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.send(AudioCommand::Effect(effect, vol));
    }

    /// Queue the cues for a batch of events
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::from_event) {
            self.play(effect);
        }
    }

    pub fn start_music(&mut self, track: &str) {
        let vol = self.master_volume;
        self.send(AudioCommand::Music(track.to_owned(), vol));
    }

    pub fn stop_music(&mut self) {
        self.send(AudioCommand::StopMusic);
    }

    fn send(&mut self, command: AudioCommand) {
        let Some(tx) = &self.tx else { return };
        if tx.send(command).is_err() {
            log::warn!("Audio thread gone - audio disabled");
            self.tx = None;
        }
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.tx = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("Audio thread panicked");
            }
        }
    }
}
