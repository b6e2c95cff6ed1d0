//! Render phase
//!
//! Walks the game state back to front and issues draw calls against a
//! `Surface`. Never mutates state.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Actor, GameState, Rect, Sprite};

/// Drawing target for one frame
pub trait Surface {
    /// Erase a region
    fn clear(&mut self, rect: Rect);
    /// Paint `sprite` stretched over `rect`
    fn draw_image(&mut self, sprite: Sprite, rect: Rect);
    /// Draw a line of text with its baseline starting at `pos`
    fn draw_text(&mut self, text: &str, pos: Vec2, font: &str);
}

/// Terrain per board row: water on top, three stone lanes, two grass rows
pub const ROW_SPRITES: [Sprite; NUM_ROWS] = [
    Sprite::WaterBlock,
    Sprite::StoneBlock,
    Sprite::StoneBlock,
    Sprite::StoneBlock,
    Sprite::GrassBlock,
    Sprite::GrassBlock,
];

/// Full canvas rectangle
pub fn canvas_rect() -> Rect {
    Rect::from_pos_size(Vec2::ZERO, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT))
}

pub fn score_text(score: u32) -> String {
    format!("Score : {score}")
}

/// Draw one complete frame
pub fn draw(state: &GameState, surface: &mut impl Surface) {
    surface.clear(canvas_rect());
    draw_board(surface);
    surface.draw_text(
        &score_text(state.player.score),
        Vec2::new(SCORE_TEXT_X, SCORE_TEXT_Y),
        SCORE_FONT,
    );

    // Back to front so the player stays above anything sharing its lane
    for enemy in &state.enemies {
        draw_actor(surface, enemy);
    }
    for life in &state.lives {
        draw_actor(surface, life);
    }
    for gem in &state.gems {
        draw_actor(surface, gem);
    }
    draw_actor(surface, &state.player);
}

fn draw_board(surface: &mut impl Surface) {
    for (row, sprite) in ROW_SPRITES.iter().enumerate() {
        for col in 0..NUM_COLS {
            let pos = Vec2::new(col as f32 * COL_WIDTH, row as f32 * ROW_HEIGHT);
            let rect = Rect::from_pos_size(pos, Vec2::new(SPRITE_WIDTH, SPRITE_HEIGHT));
            surface.draw_image(*sprite, rect);
        }
    }
}

fn draw_actor(surface: &mut impl Surface, actor: &impl Actor) {
    surface.draw_image(actor.sprite(), actor.draw_rect());
}
