/// Notable transitions produced while advancing the game
///
/// Presentation layers (sound, overlays, persistence) react to these instead of
/// being called from inside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// Ate food without reaching a new level
    FoodEaten { score: u32 },
    /// Ate food and the score reached a multiple of the level threshold
    LeveledUp { score: u32, level: u32 },
    /// The snake ran into itself, or the board is full
    GameOver { score: u32 },
    /// The running score passed the record standing when the game began
    NewHighScore { score: u32 },
}

impl GameEvent {
    pub fn score(&self) -> u32 {
        match *self {
            GameEvent::FoodEaten { score }
            | GameEvent::LeveledUp { score, .. }
            | GameEvent::GameOver { score }
            | GameEvent::NewHighScore { score } => score,
        }
    }
}
