//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as explicit `dt` values
//! - Seeded RNG only
//! - Timers are scheduled tasks, not host callbacks
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{enemy_hitbox, gem_hitbox, player_hitbox};
pub use entity::{Actor, Entity, Rect, Sprite};
pub use schedule::{Schedule, Task, TaskId};
pub use state::{
    Direction, Enemy, EntityId, GameEvent, GamePhase, GameState, Gem, GridBounds, LifeIcon,
    Outcome, Player,
};
pub use tick::{
    check_collisions, handle_input, lose_life, request_reset, reset, run_schedule,
    select_character, update,
};
