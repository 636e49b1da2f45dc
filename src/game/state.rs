use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;

/// Grid extent as a coordinate bound
///
/// `GameConfig::validate` caps the grid well inside `i32`; larger sizes
/// saturate instead of wrapping to a negative bound.
pub(crate) fn extent(grid_size: usize) -> i32 {
    i32::try_from(grid_size).unwrap_or(i32::MAX)
}

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, wrapping each axis onto a `grid_size` torus
    pub fn wrapped_by(&self, dx: i32, dy: i32, grid_size: usize) -> Self {
        let size = extent(grid_size);
        Self {
            x: (self.x + dx).rem_euclid(size),
            y: (self.y + dy).rem_euclid(size),
        }
    }

    /// One cell in a direction, reappearing on the opposite edge when leaving the grid
    pub fn wrapped_step(&self, direction: Direction, grid_size: usize) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy, grid_size)
    }

    pub fn is_within(&self, grid_size: usize) -> bool {
        let size = extent(grid_size);
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }
}

/// The snake body, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Lay out `length` segments trailing behind `head`, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize, grid_size: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let mut body = VecDeque::with_capacity(length);
        let mut segment = head;
        for _ in 0..length {
            body.push_back(segment);
            segment = segment.wrapped_by(dx, dy, grid_size);
        }
        Self { body }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Self {
        Self {
            body: segments.into_iter().collect(),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Option<Position> {
        self.body.back().copied()
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&segment| segment == pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub(crate) fn push_head(&mut self, head: Position) {
        self.body.push_front(head);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop_back()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.body.iter()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Complete game state
///
/// `direction` is what the snake moved with on the last tick. `next_direction`
/// is a one-slot input buffer: the latest accepted turn, committed at the start
/// of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub direction: Direction,
    pub next_direction: Direction,
    pub food: Position,
    pub grid_size: usize,
    pub score: u32,
    pub game_over: bool,
    /// Time between ticks, shrinks on level-up
    pub current_speed: Duration,
    /// Timestamp of the last applied tick, relative to the session clock
    pub last_tick: Duration,
}

impl GameState {
    /// Create a new running game state
    pub fn new(
        snake: Snake,
        direction: Direction,
        food: Position,
        grid_size: usize,
        speed: Duration,
    ) -> Self {
        Self {
            snake,
            direction,
            next_direction: direction,
            food,
            grid_size,
            score: 0,
            game_over: false,
            current_speed: speed,
            last_tick: Duration::ZERO,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// One-based level derived from the score
    pub fn level(&self, level_every: u32) -> u32 {
        self.score / level_every.max(1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.wrapped_step(Direction::Right, 10), Position::new(6, 5));
        assert_eq!(pos.wrapped_step(Direction::Up, 10), Position::new(5, 4));

        assert_eq!(
            Position::new(9, 3).wrapped_step(Direction::Right, 10),
            Position::new(0, 3)
        );
        assert_eq!(
            Position::new(0, 3).wrapped_step(Direction::Left, 10),
            Position::new(9, 3)
        );
        assert_eq!(
            Position::new(4, 0).wrapped_step(Direction::Up, 10),
            Position::new(4, 9)
        );
        assert_eq!(
            Position::new(4, 9).wrapped_step(Direction::Down, 10),
            Position::new(4, 0)
        );
    }

    #[test]
    fn test_wrapping_stays_in_bounds() {
        for x in 0..7 {
            for y in 0..7 {
                for dir in Direction::ALL {
                    let next = Position::new(x, y).wrapped_step(dir, 7);
                    assert!(next.is_within(7), "{:?} -> {:?}", (x, y), next);
                }
            }
        }
    }

    #[test]
    fn test_extent_never_goes_negative() {
        assert_eq!(extent(25), 25);
        assert_eq!(extent(3_000_000_000), i32::MAX);

        let edge = crate::game::config::MAX_GRID_SIZE;
        let wrapped = Position::new(0, 0).wrapped_step(Direction::Left, edge);
        assert_eq!(wrapped, Position::new(extent(edge) - 1, 0));
        assert!(wrapped.is_within(edge));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(12, 12), Direction::Right, 3, 25);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(12, 12));
        let segments: Vec<_> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![
                Position::new(12, 12),
                Position::new(11, 12),
                Position::new(10, 12)
            ]
        );
        assert_eq!(snake.tail(), Some(Position::new(10, 12)));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 10);
        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(!snake.collides_with_body(Position::new(8, 8))); // empty
        assert!(snake.contains(Position::new(5, 5)));
    }

    #[test]
    fn test_head_and_tail_updates() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 10);
        snake.push_head(Position::new(6, 5));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.pop_tail(), Some(Position::new(3, 5)));
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_level() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 10);
        let mut state = GameState::new(
            snake,
            Direction::Right,
            Position::new(0, 0),
            10,
            Duration::from_millis(150),
        );
        assert_eq!(state.level(10), 1);
        state.score = 19;
        assert_eq!(state.level(10), 2);
        state.score = 20;
        assert_eq!(state.level(10), 3);
    }
}
