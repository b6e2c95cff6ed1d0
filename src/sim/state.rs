//! Game state and core simulation types
//!
//! Entities live in kind-specific collections owned by `GameState`; nothing is
//! shared between collections.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Actor, Entity, Sprite};
use super::schedule::{Schedule, TaskId};
use crate::consts::*;
use crate::tuning::Tuning;

/// Stable identity for entities that outlive a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Logical movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Movement limits and step sizes for grid movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub row_step: f32,
    pub col_step: f32,
}

impl GridBounds {
    /// The full board; `top` is the win line
    pub const BOARD: GridBounds = GridBounds {
        top: WIN_LINE_Y,
        bottom: PLAYER_MAX_Y,
        left: PLAYER_MIN_X,
        right: PLAYER_MAX_X,
        row_step: ROW_HEIGHT,
        col_step: COL_WIDTH,
    };
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::BOARD
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { lives: u8, score: u32 },
    Lost { score: u32 },
}

/// Notifications for the host (HUD, modal, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EnemySpawned(EntityId),
    GemSpawned(EntityId),
    GemExpired(EntityId),
    GemCollected { id: EntityId, score: u32 },
    LifeLost { remaining: u8 },
    /// Win or loss; the host shows the modal
    Outcome(Outcome),
    Reset,
}

/// Whether a character has been picked yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Board is drawn but nothing moves until a character is chosen
    Selecting,
    Playing,
}

/// An enemy bug crossing one lane
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub entity: Entity,
    /// Horizontal speed (pixels/s)
    pub speed: f32,
}

impl Enemy {
    pub fn new(id: EntityId, lane_y: f32, speed: f32) -> Self {
        Self {
            id,
            entity: Entity::new(
                Sprite::EnemyBug,
                Vec2::new(ENEMY_SPAWN_X, lane_y),
                Vec2::new(SPRITE_WIDTH, SPRITE_HEIGHT),
            ),
            speed,
        }
    }

    /// Spawn off-board left on a random lane with a random speed.
    /// `None` when there is no speed to pick from.
    pub fn spawn(id: EntityId, rng: &mut impl Rng, speeds: &[f32]) -> Option<Self> {
        if speeds.is_empty() {
            return None;
        }
        let lane = ENEMY_LANES[rng.random_range(0..ENEMY_LANES.len())];
        let speed = speeds[rng.random_range(0..speeds.len())];
        Some(Self::new(id, lane, speed))
    }

    pub fn is_off_board(&self) -> bool {
        self.entity.pos.x > BOARD_RIGHT_EDGE
    }
}

impl Actor for Enemy {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn update(&mut self, dt: f32) {
        self.entity.pos.x += dt * self.speed;
    }
}

/// The player-controlled character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub entity: Entity,
    pub score: u32,
    pub lives: u8,
    pub winner: bool,
    pub char_selected: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            entity: Entity::new(
                Sprite::CharBoy,
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                Vec2::new(SPRITE_WIDTH, SPRITE_HEIGHT),
            ),
            score: 0,
            lives: MAX_LIVES,
            winner: false,
            char_selected: false,
        }
    }
}

impl Player {
    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    /// Back to the start cell
    pub fn respawn(&mut self) {
        self.entity.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
    }

    /// Move one grid cell, then check for a win or a lost game.
    ///
    /// Ignored once the player has won or has no lives left. A move that would
    /// leave `bounds` is dropped. The win bonus is only paid on the first
    /// arrival at the top row; a lost game is reported on every call while
    /// lives stay at 0.
    pub fn handle_input(
        &mut self,
        direction: Option<Direction>,
        bounds: GridBounds,
        win_bonus: u32,
    ) -> Option<Outcome> {
        if !self.winner && self.lives > 0 {
            let pos = &mut self.entity.pos;
            match direction {
                Some(Direction::Up) if pos.y - bounds.row_step >= bounds.top => {
                    pos.y -= bounds.row_step;
                }
                Some(Direction::Down) if pos.y + bounds.row_step <= bounds.bottom => {
                    pos.y += bounds.row_step;
                }
                Some(Direction::Left) if pos.x - bounds.col_step >= bounds.left => {
                    pos.x -= bounds.col_step;
                }
                Some(Direction::Right) if pos.x + bounds.col_step <= bounds.right => {
                    pos.x += bounds.col_step;
                }
                _ => {}
            }
        }

        let mut outcome = None;
        if self.entity.pos.y == bounds.top && !self.winner {
            self.winner = true;
            self.score += win_bonus;
            outcome = Some(Outcome::Won {
                lives: self.lives,
                score: self.score,
            });
        }
        if self.lives == 0 {
            outcome = Some(Outcome::Lost { score: self.score });
        }
        outcome
    }
}

impl Actor for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}

/// A collectible gem
#[derive(Debug, Clone, PartialEq)]
pub struct Gem {
    pub id: EntityId,
    pub entity: Entity,
    /// Pending timeout that removes this gem
    pub expiry: Option<TaskId>,
}

impl Gem {
    /// Place a gem on a given anchor cell (column 0..5, row 0..3)
    pub fn at_cell(id: EntityId, sprite: Sprite, col: u32, row: u32) -> Self {
        let anchor = Vec2::new(
            GEM_ORIGIN_X + COL_WIDTH * col as f32,
            GEM_ORIGIN_Y + ROW_HEIGHT * row as f32,
        );
        Self {
            id,
            entity: Entity::new(sprite, anchor, Vec2::new(GEM_DRAW_WIDTH, GEM_DRAW_HEIGHT)),
            expiry: None,
        }
    }

    /// Place a gem on a random anchor cell
    pub fn spawn(id: EntityId, sprite: Sprite, rng: &mut impl Rng) -> Self {
        let col = rng.random_range(0..GEM_COLS);
        let row = rng.random_range(0..GEM_ROWS);
        Self::at_cell(id, sprite, col, row)
    }

    /// Top-left of the drawn gem, also the origin of its hit-box
    pub fn anchor(&self) -> Vec2 {
        self.entity.pos
    }
}

impl Actor for Gem {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}

/// Heart icon, one per remaining life
#[derive(Debug, Clone, PartialEq)]
pub struct LifeIcon {
    pub entity: Entity,
}

impl LifeIcon {
    pub fn new(slot: u8) -> Self {
        Self {
            entity: Entity::new(
                Sprite::Heart,
                Vec2::new(LIFE_ICON_WIDTH * slot as f32, LIFE_ICON_Y),
                Vec2::new(LIFE_ICON_WIDTH, LIFE_ICON_HEIGHT),
            ),
        }
    }

    /// A full row of icons
    pub fn full_set() -> Vec<LifeIcon> {
        (0..MAX_LIVES).map(LifeIcon::new).collect()
    }
}

impl Actor for LifeIcon {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}

/// Complete game state, created once at startup
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: Player,
    /// Active enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Active gems, oldest first
    pub gems: Vec<Gem>,
    /// Heart icons
    pub lives: Vec<LifeIcon>,
    /// Set by "play again"; honored once the game is won or lost
    pub reset_requested: bool,
    /// Spawners and gem timeouts
    pub schedule: Schedule,
    /// Balance parameters
    pub tuning: Tuning,
    /// Notifications not yet drained by the host
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            player: Player::default(),
            enemies: Vec::new(),
            gems: Vec::new(),
            lives: LifeIcon::full_set(),
            reset_requested: false,
            schedule: Schedule::new(),
            tuning,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.player.char_selected {
            GamePhase::Playing
        } else {
            GamePhase::Selecting
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The only gem that can currently be collected
    pub fn active_gem(&self) -> Option<&Gem> {
        self.gems.first()
    }
}
