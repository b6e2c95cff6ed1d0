//! Per-frame update and game rules
//!
//! `update` is the Update phase of a frame: move entities, resolve collisions,
//! then honor a pending reset. Input, character selection and scheduled tasks
//! arrive between frames through the other entry points here.

use rand::Rng;

use super::collision::{gem_hitbox, overlapping_enemies, player_hitbox};
use super::entity::{Actor, Sprite};
use super::schedule::Task;
use super::state::{
    Direction, Enemy, EntityId, GameEvent, GameState, Gem, GridBounds, LifeIcon, Outcome,
};
use crate::consts::MAX_LIVES;

/// Advance the game by one frame of `dt` seconds
pub fn update(state: &mut GameState, dt: f32) {
    let player = &state.player;
    if !player.winner && player.char_selected && player.lives > 0 {
        update_entities(state, dt);
        check_collisions(state);
    }

    let player = &state.player;
    if (player.winner || player.lives == 0) && state.reset_requested {
        reset(state);
    }
}

/// Move enemies and drop the ones that left the board
pub fn update_entities(state: &mut GameState, dt: f32) {
    for enemy in &mut state.enemies {
        enemy.update(dt);
    }
    state.enemies.retain(|enemy| !enemy.is_off_board());

    state.player.update(dt);
}

/// Resolve player contact with enemies and the active gem
pub fn check_collisions(state: &mut GameState) {
    // Hit-box taken once; every overlapping enemy costs a life this frame
    let player_box = player_hitbox(&state.player);
    let hits = overlapping_enemies(&player_box, &state.enemies).count();
    for _ in 0..hits {
        lose_life(state);
    }

    let collected = state
        .active_gem()
        .filter(|gem| gem_hitbox(gem).intersects(&player_box))
        .map(|gem| (gem.id, gem.expiry));
    if let Some((id, expiry)) = collected {
        state.gems.retain(|gem| gem.id != id);
        if let Some(task) = expiry {
            state.schedule.cancel(task);
        }
        state.player.score += state.tuning.gem_bonus;
        log::debug!("Gem {:?} collected, score {}", id, state.player.score);
        state.emit(GameEvent::GemCollected {
            id,
            score: state.player.score,
        });
    }
}

/// Take one life. With lives left the board is cleared and the player sent
/// back to the start; at zero the game is lost.
pub fn lose_life(state: &mut GameState) {
    if state.player.lives == 0 {
        return;
    }
    state.player.lives -= 1;
    state.lives.pop();
    let remaining = state.player.lives;
    log::info!("Life lost, {} remaining", remaining);
    state.emit(GameEvent::LifeLost { remaining });

    if remaining > 0 {
        clear_board(state);
        state.player.respawn();
        return;
    }

    log::info!("Game over with score {}", state.player.score);
    let score = state.player.score;
    state.emit(GameEvent::Outcome(Outcome::Lost { score }));
}

/// Start a new round. Lives are only restored after a win or a lost game.
pub fn reset(state: &mut GameState) {
    clear_board(state);
    state.player.respawn();
    state.player.score = 0;

    if state.player.lives == 0 || state.player.winner {
        state.player.lives = MAX_LIVES;
        state.lives = LifeIcon::full_set();
    }

    state.player.winner = false;
    state.reset_requested = false;
    log::info!("Game reset");
    state.emit(GameEvent::Reset);
}

/// Ask for a reset ("play again"); applied by the next `update` once the
/// game is won or lost
pub fn request_reset(state: &mut GameState) {
    state.reset_requested = true;
}

/// Forward a key press to the player on the full board
pub fn handle_input(state: &mut GameState, direction: Option<Direction>) {
    let win_bonus = state.tuning.win_bonus;
    if let Some(outcome) = state
        .player
        .handle_input(direction, GridBounds::BOARD, win_bonus)
    {
        match outcome {
            Outcome::Won { score, .. } => log::info!("Player won with score {}", score),
            Outcome::Lost { .. } => log::debug!("Input while out of lives"),
        }
        state.emit(GameEvent::Outcome(outcome));
    }
}

/// Pick the player's character and start the spawners.
/// Returns false for sprites that are not playable characters.
pub fn select_character(state: &mut GameState, sprite: Sprite) -> bool {
    if !sprite.is_character() {
        log::warn!("Ignoring selection of non-character sprite {:?}", sprite);
        return false;
    }
    state.player.entity.sprite = sprite;
    state.player.char_selected = true;
    if state.schedule.start_spawners(&state.tuning) {
        log::info!("Character {} selected, spawners started", sprite.asset_name());
    }
    true
}

/// Advance the schedule clock and apply every task that came due, in due
/// order. Timeouts created by a spawn are due relative to that spawn, so a
/// long frame can spawn and expire a gem in the same pass.
pub fn run_schedule(state: &mut GameState, dt: f64) {
    state.schedule.advance(dt);
    while let Some(task) = state.schedule.pop_due() {
        match task {
            Task::SpawnEnemy => spawn_enemy(state),
            Task::SpawnGem => spawn_gem(state),
            Task::ExpireGem(id) => expire_gem(state, id),
        }
    }
}

/// Enemies only arrive while the game is running; a finished game keeps
/// its board as it was
fn spawn_enemy(state: &mut GameState) {
    if state.player.winner || state.player.lives == 0 {
        return;
    }
    let speeds = state.tuning.enemy_speeds.clone();
    let id = state.next_entity_id();
    let Some(enemy) = Enemy::spawn(id, state.rng(), &speeds) else {
        log::warn!("No enemy speeds configured, skipping spawn");
        return;
    };
    log::debug!(
        "Enemy {:?} spawned on lane {} at speed {}",
        id,
        enemy.entity.pos.y,
        enemy.speed
    );
    state.enemies.push(enemy);
    state.emit(GameEvent::EnemySpawned(id));
}

fn spawn_gem(state: &mut GameState) {
    if state.player.winner || state.player.lives == 0 {
        return;
    }
    let count = state.tuning.gem_sprites.len();
    if count == 0 {
        return;
    }
    let pick = state.rng().random_range(0..count);
    let sprite = state.tuning.gem_sprites[pick];
    let id = state.next_entity_id();
    let mut gem = Gem::spawn(id, sprite, state.rng());
    gem.expiry = Some(
        state
            .schedule
            .schedule_once(state.tuning.gem_lifetime, Task::ExpireGem(id)),
    );
    log::debug!("Gem {:?} spawned at {:?}", id, gem.anchor());
    state.gems.push(gem);
    state.emit(GameEvent::GemSpawned(id));
}

fn expire_gem(state: &mut GameState, id: EntityId) {
    if state.player.winner {
        return;
    }
    let before = state.gems.len();
    state.gems.retain(|gem| gem.id != id);
    if state.gems.len() != before {
        log::debug!("Gem {:?} expired", id);
        state.emit(GameEvent::GemExpired(id));
    }
}

/// Empty the enemy and gem collections and drop their pending timeouts
fn clear_board(state: &mut GameState) {
    state.enemies.clear();
    state.gems.clear();
    state
        .schedule
        .cancel_where(|t| matches!(t, Task::ExpireGem(_)));
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, Tuning::default());
        assert!(select_character(&mut state, Sprite::CharCatGirl));
        state
    }

    /// An enemy placed squarely on the player's hit-box
    fn enemy_on_player(state: &mut GameState) -> Enemy {
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(id, 147.0, 100.0);
        enemy.entity.pos.x = 200.0;
        state.player.entity.pos = Vec2::new(202.0, 151.0);
        enemy
    }

    #[test]
    fn test_select_character() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase(), GamePhase::Selecting);
        assert!(!select_character(&mut state, Sprite::EnemyBug));
        assert!(!state.player.char_selected);

        assert!(select_character(&mut state, Sprite::CharHornGirl));
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.player.entity.sprite, Sprite::CharHornGirl);
        assert!(state.schedule.spawners_started());

        // Selecting again does not add a second pair of spawners
        select_character(&mut state, Sprite::CharBoy);
        assert_eq!(state.schedule.pending().count(), 2);
    }

    #[test]
    fn test_update_gated_while_selecting() {
        let mut state = GameState::new(1, Tuning::default());
        state.enemies.push(Enemy::new(EntityId(99), 64.0, 100.0));
        update(&mut state, 1.0);
        assert_eq!(state.enemies[0].entity.pos.x, -100.0);
    }

    #[test]
    fn test_update_moves_enemies() {
        let mut state = playing_state();
        state.enemies.push(Enemy::new(EntityId(99), 147.0, 150.0));
        update(&mut state, 1.0);
        assert_eq!(state.enemies[0].entity.pos.x, 50.0);
    }

    #[test]
    fn test_off_board_enemies_removed_same_pass() {
        let mut state = playing_state();
        let mut leaving = Enemy::new(EntityId(1), 64.0, 200.0);
        leaving.entity.pos.x = 450.0;
        let mut next = Enemy::new(EntityId(2), 64.0, 200.0);
        next.entity.pos.x = 460.0;
        let staying = Enemy::new(EntityId(3), 230.0, 100.0);
        state.enemies = vec![leaving, next, staying];

        update(&mut state, 0.5);
        let ids: Vec<EntityId> = state.enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntityId(3)]);
    }

    #[test]
    fn test_enemy_collision_costs_life_and_respawns() {
        let mut state = playing_state();
        state.player.score = 60;
        let enemy = enemy_on_player(&mut state);
        state.enemies.push(enemy);
        state.gems.push(Gem::at_cell(EntityId(50), Sprite::GemBlue, 0, 0));

        check_collisions(&mut state);

        assert_eq!(state.player.lives, 2);
        assert_eq!(state.lives.len(), 2);
        assert_eq!(state.player.pos(), Vec2::new(202.0, 400.0));
        assert_eq!(state.player.score, 60);
        assert!(state.enemies.is_empty());
        assert!(state.gems.is_empty());
        assert!(state
            .drain_events()
            .contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_overlapping_enemies_each_cost_a_life() {
        let mut state = playing_state();
        let first = enemy_on_player(&mut state);
        let second = enemy_on_player(&mut state);
        state.enemies.push(first);
        state.enemies.push(second);

        check_collisions(&mut state);

        assert_eq!(state.player.lives, 1);
        assert_eq!(state.lives.len(), 1);
    }

    #[test]
    fn test_last_life_loses_game() {
        let mut state = playing_state();
        state.player.lives = 1;
        state.lives.truncate(1);
        state.player.score = 50;
        let enemy = enemy_on_player(&mut state);
        state.enemies.push(enemy);

        check_collisions(&mut state);

        assert_eq!(state.player.lives, 0);
        assert!(state.lives.is_empty());
        // Board is left as it was for the game-over screen
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.pos(), Vec2::new(202.0, 151.0));
        assert!(state
            .drain_events()
            .contains(&GameEvent::Outcome(Outcome::Lost { score: 50 })));

        // Extra hits never take lives below zero
        lose_life(&mut state);
        assert_eq!(state.player.lives, 0);
    }

    #[test]
    fn test_gem_collection_only_oldest() {
        let mut state = playing_state();
        // Player at (202, 151): hit-box x 219..286, y 213..298
        state.player.entity.pos = Vec2::new(202.0, 151.0);
        let oldest = Gem::at_cell(EntityId(10), Sprite::GemBlue, 2, 1);
        let younger = Gem::at_cell(EntityId(11), Sprite::GemOrange, 2, 1);
        state.gems = vec![oldest, younger];

        check_collisions(&mut state);
        assert_eq!(state.player.score, 50);
        assert_eq!(state.gems.len(), 1);
        assert_eq!(state.gems[0].id, EntityId(11));

        // The queued gem becomes active on the next frame
        check_collisions(&mut state);
        assert_eq!(state.player.score, 100);
        assert!(state.gems.is_empty());
    }

    #[test]
    fn test_gem_behind_oldest_is_not_collected() {
        let mut state = playing_state();
        state.player.entity.pos = Vec2::new(202.0, 151.0);
        let far = Gem::at_cell(EntityId(10), Sprite::GemBlue, 0, 2);
        let near = Gem::at_cell(EntityId(11), Sprite::GemGreen, 2, 1);
        state.gems = vec![far, near];

        check_collisions(&mut state);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.gems.len(), 2);
    }

    #[test]
    fn test_reset_after_win_restores_lives() {
        let mut state = playing_state();
        state.player.lives = 2;
        state.lives.truncate(2);
        for _ in 0..5 {
            handle_input(&mut state, Some(Direction::Up));
        }
        assert!(state.player.winner);
        assert_eq!(state.player.score, 10);

        state.enemies.push(Enemy::new(EntityId(77), 64.0, 100.0));
        request_reset(&mut state);
        update(&mut state, 0.016);

        assert!(!state.player.winner);
        assert!(!state.reset_requested);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.lives.len(), 3);
        assert_eq!(state.player.pos(), Vec2::new(202.0, 400.0));
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_reset_after_loss_restores_lives() {
        let mut state = playing_state();
        state.player.lives = 0;
        state.lives.clear();
        state.player.score = 30;
        state.player.entity.pos = Vec2::new(101.0, 151.0);

        request_reset(&mut state);
        update(&mut state, 0.016);

        assert_eq!(state.player.lives, 3);
        assert_eq!(state.lives.len(), 3);
        assert_eq!(state.player.score, 0);
        assert_eq!(state.player.pos(), Vec2::new(202.0, 400.0));
        assert!(!state.reset_requested);
        assert!(state.drain_events().contains(&GameEvent::Reset));
    }

    #[test]
    fn test_reset_keeps_lives_mid_game() {
        let mut state = playing_state();
        state.player.lives = 2;
        state.lives.truncate(2);
        state.player.score = 150;
        reset(&mut state);
        assert_eq!(state.player.lives, 2);
        assert_eq!(state.lives.len(), 2);
        assert_eq!(state.player.score, 0);
    }

    #[test]
    fn test_reset_request_waits_for_outcome() {
        let mut state = playing_state();
        state.player.score = 40;
        request_reset(&mut state);
        update(&mut state, 0.016);
        assert_eq!(state.player.score, 40);
        assert!(state.reset_requested);
    }

    #[test]
    fn test_win_then_input_does_not_pay_twice() {
        let mut state = playing_state();
        for _ in 0..8 {
            handle_input(&mut state, Some(Direction::Up));
        }
        assert_eq!(state.player.score, 10);
        let wins = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Outcome(Outcome::Won { .. })))
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_spawners_fill_board() {
        let mut state = playing_state();
        for _ in 0..6 {
            run_schedule(&mut state, 0.25);
        }
        assert_eq!(state.enemies.len(), 1);
        for _ in 0..34 {
            run_schedule(&mut state, 0.25);
        }
        assert_eq!(state.enemies.len(), 6);
        assert_eq!(state.gems.len(), 1);
    }

    #[test]
    fn test_long_frame_leaves_no_stale_gems() {
        let mut state = playing_state();
        run_schedule(&mut state, 60.0);

        // The gem due at 10s also timed out at 13s within the same frame
        assert!(state.gems.is_empty());
        assert_eq!(state.enemies.len(), 1);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::GemExpired(_))));

        run_schedule(&mut state, 2.9);
        let now = state.schedule.now();
        assert!(now > 62.0);
        assert!(state.gems.is_empty());
    }

    #[test]
    fn test_collected_gem_timeout_is_cancelled() {
        let mut state = playing_state();
        run_schedule(&mut state, 10.0);
        let gem = state.gems[0].clone();
        assert!(gem.expiry.is_some());

        state.player.entity.pos = gem.anchor() - Vec2::new(20.0, 117.0 - 68.0);
        check_collisions(&mut state);
        assert!(state.gems.is_empty());
        assert!(!state
            .schedule
            .pending()
            .any(|t| *t == Task::ExpireGem(gem.id)));
    }

    #[test]
    fn test_gem_expires_by_identity() {
        let mut state = playing_state();
        run_schedule(&mut state, 10.0);
        assert_eq!(state.gems.len(), 1);
        let expiring = state.gems[0].id;

        // A gem inserted ahead of the spawned one must survive the timeout
        state.gems.insert(0, Gem::at_cell(EntityId(500), Sprite::GemGreen, 0, 0));
        run_schedule(&mut state, 3.0);

        assert_eq!(state.gems.len(), 1);
        assert_eq!(state.gems[0].id, EntityId(500));
        assert!(state.drain_events().contains(&GameEvent::GemExpired(expiring)));
    }

    #[test]
    fn test_gem_timeout_suppressed_after_win() {
        let mut state = playing_state();
        run_schedule(&mut state, 10.0);
        assert_eq!(state.gems.len(), 1);
        state.player.winner = true;
        run_schedule(&mut state, 3.0);
        assert_eq!(state.gems.len(), 1);
    }

    #[test]
    fn test_no_gems_after_win_or_loss() {
        let mut state = playing_state();
        state.player.winner = true;
        run_schedule(&mut state, 10.0);
        assert!(state.gems.is_empty());
        // Nor enemies: a finished board stays as it was
        assert!(state.enemies.is_empty());

        let mut state = playing_state();
        state.player.lives = 0;
        run_schedule(&mut state, 10.0);
        assert!(state.enemies.is_empty());
        assert!(state.gems.is_empty());
    }

    #[test]
    fn test_reset_cancels_gem_timeouts() {
        let mut state = playing_state();
        run_schedule(&mut state, 10.0);
        assert!(state
            .schedule
            .pending()
            .any(|t| matches!(t, Task::ExpireGem(_))));
        reset(&mut state);
        assert!(!state
            .schedule
            .pending()
            .any(|t| matches!(t, Task::ExpireGem(_))));
        // Spawners survive a reset
        assert!(state.schedule.pending().any(|t| *t == Task::SpawnEnemy));
    }

    #[test]
    fn test_determinism() {
        let mut a = playing_state();
        let mut b = playing_state();
        for _ in 0..600 {
            run_schedule(&mut a, 1.0 / 60.0);
            run_schedule(&mut b, 1.0 / 60.0);
            update(&mut a, 1.0 / 60.0);
            update(&mut b, 1.0 / 60.0);
        }
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.gems, b.gems);
        assert_eq!(a.player, b.player);
    }

    fn direction() -> impl Strategy<Value = Option<Direction>> {
        prop_oneof![
            Just(Some(Direction::Up)),
            Just(Some(Direction::Down)),
            Just(Some(Direction::Left)),
            Just(Some(Direction::Right)),
            Just(None),
        ]
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_grid(inputs in prop::collection::vec(direction(), 0..64)) {
            let mut state = playing_state();
            for input in inputs {
                handle_input(&mut state, input);
                let pos = state.player.pos();
                prop_assert!((0.0..=404.0).contains(&pos.x));
                prop_assert!((-15.0..=400.0).contains(&pos.y));
                prop_assert_eq!((pos.x / 101.0).fract(), 0.0);
                prop_assert_eq!(((pos.y + 15.0) / 83.0).fract(), 0.0);
            }
        }

        #[test]
        fn prop_finished_player_never_moves(
            inputs in prop::collection::vec(direction(), 1..16),
            won in any::<bool>(),
        ) {
            let mut state = playing_state();
            if won {
                state.player.winner = true;
            } else {
                state.player.lives = 0;
            }
            let start = state.player.pos();
            for input in inputs {
                handle_input(&mut state, input);
                prop_assert_eq!(state.player.pos(), start);
            }
        }

        #[test]
        fn prop_enemy_advances_by_dt_times_speed(
            speed_index in 0usize..3,
            dt in 0.001f32..0.25,
        ) {
            let speed = [100.0f32, 150.0, 200.0][speed_index];
            let mut enemy = Enemy::new(EntityId(1), 64.0, speed);
            let before = enemy.entity.pos.x;
            enemy.update(dt);
            prop_assert!(enemy.entity.pos.x > before);
            prop_assert_eq!(enemy.entity.pos.x, before + dt * speed);
        }
    }
}
