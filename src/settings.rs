//! Game settings and preferences
//!
//! Persisted as individual keys in the preferences store, so a store written
//! by an older build with fewer keys still loads.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::KeyValueStore;

const KEY_MASTER_VOLUME: &str = "masterVolume";
const KEY_MUSIC_VOLUME: &str = "musicVolume";
const KEY_SFX_VOLUME: &str = "sfxVolume";
const KEY_RESOLUTION: &str = "resolution";
const KEY_FULLSCREEN: &str = "fullscreen";

/// Selectable window sizes; `Settings::resolution` indexes into this
pub const RESOLUTIONS: [(u32, u32); 4] = [(1920, 1080), (1600, 900), (1366, 768), (1280, 720)];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Index into `RESOLUTIONS`
    pub resolution: usize,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_volume: 0.7,
            sfx_volume: 0.8,
            resolution: 0,
            fullscreen: false,
        }
    }
}

impl Settings {
    /// Read settings, falling back to the default for each missing key
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let volume = |key, default: f32| {
            store
                .get_float(key)
                .filter(|v| v.is_finite())
                .map_or(default, |v| v.clamp(0.0, 1.0))
        };
        let resolution = store
            .get_int(KEY_RESOLUTION)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < RESOLUTIONS.len())
            .unwrap_or(defaults.resolution);

        let settings = Self {
            master_volume: volume(KEY_MASTER_VOLUME, defaults.master_volume),
            music_volume: volume(KEY_MUSIC_VOLUME, defaults.music_volume),
            sfx_volume: volume(KEY_SFX_VOLUME, defaults.sfx_volume),
            resolution,
            fullscreen: store.get_bool(KEY_FULLSCREEN).unwrap_or(defaults.fullscreen),
        };
        log::info!("Loaded settings: {settings:?}");
        settings
    }

    /// Write every key and flush
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set_float(KEY_MASTER_VOLUME, self.master_volume);
        store.set_float(KEY_MUSIC_VOLUME, self.music_volume);
        store.set_float(KEY_SFX_VOLUME, self.sfx_volume);
        store.set_int(KEY_RESOLUTION, self.resolution as i64);
        store.set_bool(KEY_FULLSCREEN, self.fullscreen);
        store.flush()?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Window size for the selected resolution
    pub fn resolution_size(&self) -> (u32, u32) {
        RESOLUTIONS
            .get(self.resolution)
            .copied()
            .unwrap_or(RESOLUTIONS[0])
    }

    /// Step to the next resolution, wrapping around
    pub fn cycle_resolution(&mut self) {
        self.resolution = (self.resolution + 1) % RESOLUTIONS.len();
    }

    /// Effective sound effect gain
    pub fn effective_sfx_volume(&self) -> f32 {
        self.master_volume * self.sfx_volume
    }

    /// Effective music gain
    pub fn effective_music_volume(&self) -> f32 {
        self.master_volume * self.music_volume
    }
}
