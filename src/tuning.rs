//! Data-driven game balance
//!
//! Spawn cadence, enemy speeds, gem lifetime and score bonuses. Loaded from
//! JSON (a `<script id="tuning">` block on the page, or a file on native);
//! missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::entity::Sprite;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Discrete enemy speeds (pixels/s), one picked uniformly per enemy
    pub enemy_speeds: Vec<f32>,
    /// Seconds between enemy spawns
    pub enemy_spawn_interval: f64,
    /// Seconds between gem spawns
    pub gem_spawn_interval: f64,
    /// Seconds a gem stays on the board if not collected
    pub gem_lifetime: f64,
    /// Gem sprites, one picked uniformly per gem
    pub gem_sprites: Vec<Sprite>,
    /// Score for collecting a gem
    pub gem_bonus: u32,
    /// Score for reaching the water
    pub win_bonus: u32,
    /// Seconds between a win/loss and the modal appearing
    pub modal_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_speeds: vec![100.0, 150.0, 200.0],
            enemy_spawn_interval: 1.5,
            gem_spawn_interval: 10.0,
            gem_lifetime: 3.0,
            gem_sprites: vec![Sprite::GemBlue, Sprite::GemGreen, Sprite::GemOrange],
            gem_bonus: 50,
            win_bonus: 10,
            modal_delay: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.enemy_speeds.is_empty() {
            return Err(TuningError::Invalid("enemy_speeds is empty".into()));
        }
        if let Some(speed) = self.enemy_speeds.iter().find(|s| !(**s > 0.0)) {
            return Err(TuningError::Invalid(format!(
                "enemy speed must be positive, got {speed}"
            )));
        }
        if self.gem_sprites.is_empty() {
            return Err(TuningError::Invalid("gem_sprites is empty".into()));
        }
        if let Some(sprite) = self.gem_sprites.iter().find(|s| !s.is_gem()) {
            return Err(TuningError::Invalid(format!(
                "gem_sprites contains '{}', which is not a gem",
                sprite.asset_name()
            )));
        }
        for (name, value) in [
            ("enemy_spawn_interval", self.enemy_spawn_interval),
            ("gem_spawn_interval", self.gem_spawn_interval),
            ("gem_lifetime", self.gem_lifetime),
        ] {
            if !(value > 0.0) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.modal_delay >= 0.0) {
            return Err(TuningError::Invalid(format!(
                "modal_delay must be zero or more, got {}",
                self.modal_delay
            )));
        }
        Ok(())
    }

    /// Element id of the inline tuning block
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "tuning";

    /// Load tuning from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from page");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring page tuning: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Environment variable naming a tuning file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "LANE_CROSSER_TUNING";

    /// Load tuning from the file named by `LANE_CROSSER_TUNING` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, TuningError> {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)?;
                let tuning = Self::from_json(&json)?;
                log::info!("Loaded tuning from {path}");
                Ok(tuning)
            }
            Err(_) => {
                log::info!("Using default tuning");
                Ok(Self::default())
            }
        }
    }
}
