//! Drawable entity primitives
//!
//! Every on-board object is an `Entity` (sprite + position + size) wrapped by
//! a kind-specific type. Kinds share behavior through the `Actor` trait rather
//! than a base type.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Sprite identifiers known to the asset provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sprite {
    WaterBlock,
    StoneBlock,
    GrassBlock,
    EnemyBug,
    Heart,
    CharBoy,
    CharCatGirl,
    CharHornGirl,
    CharPinkGirl,
    CharPrincessGirl,
    GemBlue,
    GemGreen,
    GemOrange,
}

impl Sprite {
    /// Every sprite the game draws
    pub const ALL: [Sprite; 13] = [
        Sprite::StoneBlock,
        Sprite::WaterBlock,
        Sprite::GrassBlock,
        Sprite::EnemyBug,
        Sprite::Heart,
        Sprite::CharBoy,
        Sprite::CharCatGirl,
        Sprite::CharHornGirl,
        Sprite::CharPinkGirl,
        Sprite::CharPrincessGirl,
        Sprite::GemBlue,
        Sprite::GemGreen,
        Sprite::GemOrange,
    ];

    /// Asset name, as used in sprite definitions and DOM data attributes
    pub fn asset_name(&self) -> &'static str {
        match self {
            Sprite::WaterBlock => "water-block",
            Sprite::StoneBlock => "stone-block",
            Sprite::GrassBlock => "grass-block",
            Sprite::EnemyBug => "enemy-bug",
            Sprite::Heart => "heart",
            Sprite::CharBoy => "char-boy",
            Sprite::CharCatGirl => "char-cat-girl",
            Sprite::CharHornGirl => "char-horn-girl",
            Sprite::CharPinkGirl => "char-pink-girl",
            Sprite::CharPrincessGirl => "char-princess-girl",
            Sprite::GemBlue => "gem-blue",
            Sprite::GemGreen => "gem-green",
            Sprite::GemOrange => "gem-orange",
        }
    }

    /// Playable character portraits
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            Sprite::CharBoy
                | Sprite::CharCatGirl
                | Sprite::CharHornGirl
                | Sprite::CharPinkGirl
                | Sprite::CharPrincessGirl
        )
    }

    pub fn is_gem(&self) -> bool {
        matches!(self, Sprite::GemBlue | Sprite::GemGreen | Sprite::GemOrange)
    }

    /// Reverse of `asset_name`
    pub fn from_asset_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.asset_name() == name)
    }
}

/// Axis-aligned rectangle in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            left: pos.x,
            top: pos.y,
            right: pos.x + size.x,
            bottom: pos.y + size.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Positioned, sized, drawable record
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub sprite: Sprite,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Entity {
    pub fn new(sprite: Sprite, pos: Vec2, size: Vec2) -> Self {
        Self { sprite, pos, size }
    }
}

/// Capabilities shared by every entity kind
pub trait Actor {
    fn entity(&self) -> &Entity;

    /// Rectangle the sprite is drawn into
    fn draw_rect(&self) -> Rect {
        let e = self.entity();
        Rect::from_pos_size(e.pos, e.size)
    }

    fn sprite(&self) -> Sprite {
        self.entity().sprite
    }

    /// Advance by `dt` seconds. Most kinds are static.
    fn update(&mut self, _dt: f32) {}
}
