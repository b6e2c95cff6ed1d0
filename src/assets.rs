//! Asset provider
//!
//! Sprites are vector definitions (layers of rectangles and ellipses in unit
//! space) bundled as JSON. `Resources` loads a list of sprites up front,
//! caches them by id, and runs ready callbacks once everything resolved.
//! Missing or malformed definitions are reported instead of leaving the game
//! waiting forever.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::sim::entity::Sprite;

/// Bundled sprite definitions
const SPRITE_SHEET: &str = include_str!("../assets/sprites.json");

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("sprite sheet is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sprite sheet has no definition for '{}'", .0.asset_name())]
    Missing(Sprite),
    #[error("sprite '{}' was requested before it was loaded", .0.asset_name())]
    NotLoaded(Sprite),
}

/// Primitive used by a sprite layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rect,
    Ellipse,
}

/// One colored primitive; coordinates are fractions of the draw rectangle
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    pub shape: Shape,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: [f32; 4],
}

/// A sprite, painted back to front
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpriteDef {
    pub layers: Vec<Layer>,
}

#[derive(Debug, Deserialize)]
struct SpriteSheet {
    sprites: HashMap<String, SpriteDef>,
}

/// Cache of loaded sprite definitions
#[derive(Default)]
pub struct Resources {
    cache: HashMap<Sprite, SpriteDef>,
    ready: bool,
    callbacks: Vec<Box<dyn FnOnce()>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `sprites` from the bundled sheet
    pub fn load(&mut self, sprites: &[Sprite]) -> Result<(), AssetError> {
        self.load_from_json(SPRITE_SHEET, sprites)
    }

    /// Load `sprites` from a sheet. All-or-nothing: on error the cache is
    /// left untouched and callbacks stay queued.
    pub fn load_from_json(&mut self, json: &str, sprites: &[Sprite]) -> Result<(), AssetError> {
        let mut sheet: SpriteSheet = serde_json::from_str(json)?;

        let mut loaded = HashMap::with_capacity(sprites.len());
        for &sprite in sprites {
            let def = sheet
                .sprites
                .remove(sprite.asset_name())
                .ok_or(AssetError::Missing(sprite))?;
            loaded.insert(sprite, def);
        }

        log::info!("Loaded {} sprites", loaded.len());
        self.cache.extend(loaded);
        self.ready = true;
        for callback in self.callbacks.drain(..) {
            callback();
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Cached definition for `sprite`
    pub fn get(&self, sprite: Sprite) -> Result<&SpriteDef, AssetError> {
        self.cache.get(&sprite).ok_or(AssetError::NotLoaded(sprite))
    }

    /// Run `callback` once loading has finished (immediately if it already has)
    pub fn on_ready(&mut self, callback: impl FnOnce() + 'static) {
        if self.ready {
            callback();
        } else {
            self.callbacks.push(Box::new(callback));
        }
    }
}
