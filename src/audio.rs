//! Audio hook
//!
//! The game only ever says "play this effect" or "start/stop this loop". A
//! backend does the actual mixing; without one every call is a no-op, so a
//! missing sound device never stops a run.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player leaves the ground or air-jumps
    Jump,
    /// Player lands on a regular platform
    Landing,
    /// Player lands on a bouncy platform
    Bounce,
    /// Player fell below the danger floor
    GameOver,
    /// Menu navigation
    Click,
}

impl SoundEffect {
    /// Mix level before settings are applied
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::Jump => 0.7,
            SoundEffect::Landing => 0.6,
            SoundEffect::Bounce => 0.8,
            SoundEffect::GameOver => 0.7,
            SoundEffect::Click => 0.3,
        }
    }
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Background,
}

impl MusicTrack {
    pub fn base_volume(&self) -> f32 {
        match self {
            MusicTrack::Background => 0.3,
        }
    }
}

/// Something that can actually make noise. Calls must not block.
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32);
    fn play_loop(&mut self, track: MusicTrack, volume: f32);
    fn stop_loop(&mut self, track: MusicTrack);
}

/// Backend that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {effect:?} at {volume:.2}");
    }

    fn play_loop(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("music {track:?} started at {volume:.2}");
    }

    fn stop_loop(&mut self, track: MusicTrack) {
        log::debug!("music {track:?} stopped");
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_loop: Option<MusicTrack>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        let defaults = Settings::default();
        Self {
            backend,
            master_volume: defaults.master_volume,
            sfx_volume: defaults.sfx_volume,
            music_volume: defaults.music_volume,
            muted: false,
            current_loop: None,
        }
    }

    /// Take volumes from settings. A playing loop is restarted at the new level.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        if let Some(track) = self.current_loop {
            self.play_loop(track);
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn current_loop(&self) -> Option<MusicTrack> {
        self.current_loop
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = effect.base_volume() * self.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else { return };
        backend.play_effect(effect, vol);
    }

    /// Start a loop, replacing whatever was playing
    pub fn play_loop(&mut self, track: MusicTrack) {
        let vol = track.base_volume() * self.effective_music_volume();
        let previous = self.current_loop.replace(track);
        let Some(backend) = self.backend.as_mut() else { return };
        if let Some(previous) = previous {
            backend.stop_loop(previous);
        }
        backend.play_loop(track, vol);
    }

    pub fn stop_loop(&mut self) {
        let Some(track) = self.current_loop.take() else { return };
        if let Some(backend) = self.backend.as_mut() {
            backend.stop_loop(track);
        }
    }
}
