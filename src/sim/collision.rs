//! Hit-box derivation and overlap tests
//!
//! Sprites carry transparent padding, so each kind collides with a rectangle
//! inset from its drawn bounds.

use super::entity::Rect;
use super::state::{Enemy, Gem, Player};
use crate::consts::*;

/// Player hit-box: 17px in from each side, 62px down from the top, 86px shorter
pub fn player_hitbox(player: &Player) -> Rect {
    let e = &player.entity;
    let left = e.pos.x.floor() + PLAYER_HIT_INSET_X;
    let top = e.pos.y + PLAYER_HIT_INSET_TOP;
    Rect {
        left,
        top,
        right: left + e.size.x - 2.0 * PLAYER_HIT_INSET_X,
        bottom: top + e.size.y - PLAYER_HIT_SHRINK_H,
    }
}

/// Enemy hit-box: full width, a band starting 76px below the sprite top
pub fn enemy_hitbox(enemy: &Enemy) -> Rect {
    let e = &enemy.entity;
    let left = e.pos.x.floor();
    let top = e.pos.y.floor() + ENEMY_HIT_INSET_TOP;
    Rect {
        left,
        top,
        right: left + e.size.x,
        bottom: top + e.size.y - ENEMY_HIT_SHRINK_H,
    }
}

/// Gem hit-box: a 60x30 band 30px below the anchor
pub fn gem_hitbox(gem: &Gem) -> Rect {
    let anchor = gem.anchor();
    let top = anchor.y + GEM_HIT_OFFSET_Y;
    Rect {
        left: anchor.x,
        top,
        right: anchor.x + GEM_DRAW_WIDTH,
        bottom: top + GEM_HIT_HEIGHT,
    }
}

/// Every enemy overlapping the given player hit-box, in collection order
pub fn overlapping_enemies<'a>(
    player_box: &'a Rect,
    enemies: &'a [Enemy],
) -> impl Iterator<Item = &'a Enemy> + 'a {
    enemies
        .iter()
        .filter(move |enemy| enemy_hitbox(enemy).intersects(player_box))
}
