//! A running game: simulation plus its audio and persistence hooks
//!
//! The host feeds wall-clock frame deltas and input; the session slices them
//! into fixed simulation ticks and turns the resulting events into sounds and
//! high-score writes.

use crate::audio::{AudioBackend, AudioManager, MusicTrack, SoundEffect};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, PlatformKind, TickInput, tick};
use crate::tuning::Tuning;

pub struct GameSession {
    pub state: GameState,
    /// Input for the next tick. One-shot edges are cleared once consumed.
    pub input: TickInput,
    accumulator: f32,
    settings: Settings,
    high_score: HighScore,
    /// Set when the last finished run beat the stored best
    new_high_score: bool,
    audio: AudioManager,
    store: Box<dyn KeyValueStore>,
}

impl GameSession {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        store: Box<dyn KeyValueStore>,
        audio_backend: Option<Box<dyn AudioBackend>>,
    ) -> Self {
        let settings = Settings::load(store.as_ref());
        let high_score = HighScore::load(store.as_ref());
        let mut audio = AudioManager::new(audio_backend);
        audio.apply_settings(&settings);
        audio.play_loop(MusicTrack::Background);

        Self {
            state: GameState::new(seed, tuning),
            input: TickInput::default(),
            accumulator: 0.0,
            settings,
            high_score,
            new_high_score: false,
            audio,
            store,
        }
    }

    /// Run as many fixed ticks as `frame_dt` covers. Returns the events raised.
    pub fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            events.extend(self.step(&input));
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.jump = false;
            self.input.pause = false;
            self.input.restart = false;
            self.input.menu = false;
        }
        // Drop backlog the substep cap could not absorb
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Advance exactly one tick with `input`
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input, SIM_DT);
        let events = self.state.drain_events();
        for event in &events {
            self.handle_event(event);
        }
        events
    }

    fn handle_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Jumped { .. } => self.audio.play(SoundEffect::Jump),
            GameEvent::Landed {
                kind: PlatformKind::Bouncy,
                ..
            } => self.audio.play(SoundEffect::Bounce),
            GameEvent::Landed { .. } => self.audio.play(SoundEffect::Landing),
            GameEvent::GameOver { score, .. } => {
                self.audio.stop_loop();
                self.audio.play(SoundEffect::GameOver);
                self.new_high_score = match self.high_score.submit(score, self.store.as_mut()) {
                    Ok(saved) => saved,
                    Err(e) => {
                        log::warn!("Could not save high score: {e}");
                        false
                    }
                };
            }
            GameEvent::Restarted => {
                self.new_high_score = false;
                self.audio.play_loop(MusicTrack::Background);
            }
            GameEvent::ReturnToMenu => {
                self.audio.stop_loop();
                self.audio.play(SoundEffect::Click);
            }
            GameEvent::CelebrationFloor { .. } | GameEvent::Paused | GameEvent::Resumed => {}
        }
    }

    /// Replace the settings, apply them to audio and persist them
    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        if let Err(e) = settings.save(self.store.as_mut()) {
            log::warn!("Could not save settings: {e}");
        }
        self.settings = settings;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::audio::recording::{Call, Recorder};
    use crate::persistence::MemoryStore;
    use crate::sim::{DangerFloor, GamePhase};

    fn session() -> (GameSession, Rc<RefCell<Vec<Call>>>) {
        let recorder = Recorder::default();
        let calls = Rc::clone(&recorder.calls);
        let session = GameSession::new(
            11,
            Tuning::default(),
            Box::new(MemoryStore::new()),
            Some(Box::new(recorder)),
        );
        (session, calls)
    }

    fn effects(calls: &Rc<RefCell<Vec<Call>>>) -> Vec<SoundEffect> {
        calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Effect(e, _) => Some(*e),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_starts_background_loop() {
        let (session, calls) = session();
        assert!(matches!(
            calls.borrow()[0],
            Call::LoopStart(MusicTrack::Background, _)
        ));
        assert_eq!(session.high_score(), 0);
    }

    #[test]
    fn test_jump_plays_sound() {
        let (mut session, calls) = session();
        let events = session.step(&TickInput {
            jump: true,
            ..Default::default()
        });
        assert_eq!(events, vec![GameEvent::Jumped { combo: 1 }]);
        assert_eq!(effects(&calls), vec![SoundEffect::Jump]);
    }

    #[test]
    fn test_game_over_saves_high_score() {
        let (mut session, calls) = session();
        let t = Tuning::default();

        // Climb so the run has a score, then let the floor catch up
        session.state.player.set_position(Vec2::new(900.0, 5_000.0));
        session.state.player.set_on_ground(false);
        session.step(&TickInput::default());
        let score = session.state.score.score();
        assert!(score > 0);

        session.state.danger_floor = DangerFloor::with_height(100_000.0, &t);
        let events = session.step(&TickInput::default());
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })));
        assert_eq!(session.state.phase, GamePhase::GameOver);

        assert_eq!(session.store().get_int("highScore"), Some(score as i64));
        assert_eq!(session.high_score(), score);
        assert!(session.is_new_high_score());
        assert_eq!(effects(&calls).last(), Some(&SoundEffect::GameOver));
        assert!(calls.borrow().contains(&Call::LoopStop(MusicTrack::Background)));

        // Restart brings the music back and clears the flag
        session.step(&TickInput {
            restart: true,
            ..Default::default()
        });
        assert!(!session.is_new_high_score());
        assert_eq!(
            calls.borrow().last(),
            Some(&Call::LoopStart(
                MusicTrack::Background,
                MusicTrack::Background.base_volume() * 0.7
            ))
        );
    }

    #[test]
    fn test_update_accumulates_fixed_ticks() {
        let (mut session, _) = session();
        session.update(SIM_DT * 3.5);
        assert_eq!(session.state.time_ticks, 3);
        session.update(SIM_DT * 0.6);
        assert_eq!(session.state.time_ticks, 4);

        // A huge stall is capped rather than replayed
        session.update(10.0);
        assert!(session.state.time_ticks <= 4 + u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_one_shot_input_cleared_after_tick() {
        let (mut session, _) = session();
        session.input.jump = true;
        session.input.right = true;
        let events = session.update(SIM_DT * 2.0);
        let jumps = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Jumped { .. }))
            .count();
        assert_eq!(jumps, 1);
        assert!(!session.input.jump);
        assert!(session.input.right);
    }

    #[test]
    fn test_update_settings_persists() {
        let (mut session, _) = session();
        session.update_settings(Settings {
            resolution: 2,
            ..Settings::default()
        });
        assert_eq!(session.store().get_int("resolution"), Some(2));
        assert_eq!(session.settings().resolution, 2);
    }
}
