use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    event::GameEvent,
    state::{extent, GameState, Position, Snake},
};

/// The game engine that handles all game logic
///
/// Food placement is rejection sampling over the whole grid. It terminates as
/// long as at least one cell is free; a full board ends the game before the
/// sampler would be asked for a cell.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
        })
    }

    /// Engine with a reproducible food sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Fresh running state: centred snake heading right, score 0, initial speed
    pub fn reset(&mut self, now: Duration) -> GameState {
        let center = extent(self.config.grid_size / 2);

        let snake = Snake::new(
            Position::new(center, center),
            Direction::Right,
            self.config.initial_length,
            self.config.grid_size,
        );

        // A fresh snake never fills the board, validated by GameConfig.
        let food = self.generate_food(&snake).unwrap_or(Position::new(0, 0));

        let mut state = GameState::new(
            snake,
            Direction::Right,
            food,
            self.config.grid_size,
            self.config.tick_interval(),
        );
        state.last_tick = now;
        state
    }

    /// Queue a turn for the next tick
    ///
    /// Rejected when the game is over or when the turn would reverse the
    /// direction the snake last moved in. Accepted turns overwrite any turn
    /// already queued since the last tick.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) -> bool {
        if state.game_over || direction.is_opposite(state.direction) {
            return false;
        }
        state.next_direction = direction;
        true
    }

    /// Advance the game by one cell
    pub fn tick(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        if state.game_over {
            return Vec::new();
        }

        state.direction = state.next_direction;
        let new_head = state
            .snake
            .head()
            .wrapped_step(state.direction, self.config.grid_size);

        // Index 0 moves out of the way, so only the rest of the body counts.
        if state.snake.collides_with_body(new_head) {
            state.game_over = true;
            tracing::info!(score = state.score, "snake ran into itself");
            return vec![GameEvent::GameOver { score: state.score }];
        }

        state.snake.push_head(new_head);

        if new_head != state.food {
            state.snake.pop_tail();
            return Vec::new();
        }

        state.score += 1;
        let mut events = Vec::with_capacity(2);

        if state.score.checked_rem(self.config.level_every) == Some(0) {
            state.current_speed = state
                .current_speed
                .saturating_sub(self.config.speed_step())
                .max(self.config.min_interval());
            let level = state.level(self.config.level_every);
            tracing::info!(
                score = state.score,
                level,
                interval_ms = state.current_speed.as_millis() as u64,
                "level up"
            );
            events.push(GameEvent::LeveledUp {
                score: state.score,
                level,
            });
        } else {
            events.push(GameEvent::FoodEaten { score: state.score });
        }

        match self.generate_food(&state.snake) {
            Some(food) => state.food = food,
            None => {
                state.game_over = true;
                tracing::info!(score = state.score, "board full");
                events.push(GameEvent::GameOver { score: state.score });
            }
        }

        events
    }

    /// Pick a uniformly random cell not covered by the snake
    ///
    /// Returns `None` only when the snake covers every cell.
    pub fn generate_food(&mut self, snake: &Snake) -> Option<Position> {
        if snake.len() >= self.config.cell_count() {
            return None;
        }

        let size = extent(self.config.grid_size);
        loop {
            let pos = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));

            if !snake.contains(pos) {
                return Some(pos);
            }
        }
    }
}
