//! Lane Crosser - a single-screen lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, spawning, game state)
//! - `scene`: Render phase, turns game state into draw calls on a `Surface`
//! - `renderer`: WebGPU rendering pipeline
//! - `assets`: Sprite definitions and the asset provider
//! - `platform`: Input mapping and frame timing
//! - `tuning`: Data-driven game balance
//! - `ui`: Character roster and win/loss modal

pub mod assets;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use assets::{AssetError, Resources};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 505.0;
    pub const CANVAS_HEIGHT: f32 = 606.0;

    /// Board grid (6 rows x 5 columns of terrain tiles)
    pub const NUM_ROWS: usize = 6;
    pub const NUM_COLS: usize = 5;
    /// Width of one grid cell (horizontal player step)
    pub const COL_WIDTH: f32 = 101.0;
    /// Height of one grid cell (vertical player step)
    pub const ROW_HEIGHT: f32 = 83.0;

    /// Nominal sprite size for players and enemies
    pub const SPRITE_WIDTH: f32 = 101.0;
    pub const SPRITE_HEIGHT: f32 = 171.0;

    /// Player start cell
    pub const PLAYER_START_X: f32 = 202.0;
    pub const PLAYER_START_Y: f32 = 400.0;
    /// Player movement bounds (top row is the win line)
    pub const PLAYER_MIN_X: f32 = 0.0;
    pub const PLAYER_MAX_X: f32 = 404.0;
    pub const WIN_LINE_Y: f32 = -15.0;
    pub const PLAYER_MAX_Y: f32 = 400.0;

    /// Enemies enter off-board on the left
    pub const ENEMY_SPAWN_X: f32 = -100.0;
    /// Enemies past this x are removed
    pub const BOARD_RIGHT_EDGE: f32 = 500.0;
    /// The three stone lanes enemies travel along
    pub const ENEMY_LANES: [f32; 3] = [64.0, 147.0, 230.0];

    /// Player hit-box insets relative to the sprite rectangle
    pub const PLAYER_HIT_INSET_X: f32 = 17.0;
    pub const PLAYER_HIT_INSET_TOP: f32 = 62.0;
    pub const PLAYER_HIT_SHRINK_H: f32 = 86.0;
    /// Enemy hit-box vertical trim
    pub const ENEMY_HIT_INSET_TOP: f32 = 76.0;
    pub const ENEMY_HIT_SHRINK_H: f32 = 98.0;

    /// Gem anchor grid: 5 columns x 3 rows over the stone band
    pub const GEM_ORIGIN_X: f32 = 20.0;
    pub const GEM_ORIGIN_Y: f32 = 117.0;
    pub const GEM_COLS: u32 = 5;
    pub const GEM_ROWS: u32 = 3;
    /// Gems are drawn smaller than a full tile
    pub const GEM_DRAW_WIDTH: f32 = 60.0;
    pub const GEM_DRAW_HEIGHT: f32 = 90.0;
    /// Gem hit-box (a 60x30 band 30px below the anchor)
    pub const GEM_HIT_OFFSET_Y: f32 = 30.0;
    pub const GEM_HIT_HEIGHT: f32 = 30.0;

    /// Lives and their heart icons
    pub const MAX_LIVES: u8 = 3;
    pub const LIFE_ICON_WIDTH: f32 = 20.0;
    pub const LIFE_ICON_HEIGHT: f32 = 35.0;
    pub const LIFE_ICON_Y: f32 = 10.0;

    /// Score text placement
    pub const SCORE_TEXT_X: f32 = 402.0;
    pub const SCORE_TEXT_Y: f32 = 40.0;
    pub const SCORE_FONT: &str = "20px Georgia";
}
