//! Game settings and preferences
//!
//! Persisted separately from snapshots through the host key/value store.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform::KeyValueStore;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 30,
            QualityPreset::Medium => 120,
            QualityPreset::High => 256,
        }
    }

    /// Background stars per session
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 5,
            QualityPreset::Medium => 10,
            QualityPreset::High => 15,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Explosion particles
    pub particles: bool,
    /// Rain layer
    pub weather: bool,
    /// Lightning screen flash
    pub lightning_flash: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            particles: true,
            weather: true,
            lightning_flash: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "cape_dash_settings";

    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;

        // Low preset drops the full-screen flash
        if preset == QualityPreset::Low {
            self.lightning_flash = false;
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Flash intensity a renderer should draw for a raw flash value
    pub fn effective_flash(&self, flash: f32) -> f32 {
        if self.lightning_flash && self.weather {
            flash
        } else {
            0.0
        }
    }

    /// Rain layer opacity a renderer should draw for a raw opacity value
    pub fn effective_rain_opacity(&self, opacity: f32) -> f32 {
        if self.weather { opacity } else { 0.0 }
    }

    /// Load settings, falling back to defaults when absent
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        match store.get(Self::STORAGE_KEY)? {
            Some(json) => {
                let settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings");
                Ok(settings)
            }
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
