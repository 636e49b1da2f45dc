use super::event::GameEvent;

/// Best score seen by this process, seeded from the persisted value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    best: u32,
    /// Record standing when the current game started
    to_beat: u32,
    announced: bool,
}

impl HighScore {
    pub fn new(persisted: u32) -> Self {
        Self {
            best: persisted,
            to_beat: persisted,
            announced: false,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Whether the game in progress has beaten the record it started against
    pub fn beaten_this_game(&self) -> bool {
        self.announced
    }

    /// Re-arm the announcement against the record as it stands now
    pub fn start_game(&mut self) {
        self.to_beat = self.best;
        self.announced = false;
    }

    /// Fold a new score in
    ///
    /// Returns `(changed, event)`: `changed` whenever the best score moved and
    /// must be persisted, `event` only the first time this game beats the
    /// record it started against.
    pub fn observe(&mut self, score: u32) -> (bool, Option<GameEvent>) {
        if score <= self.best {
            return (false, None);
        }
        self.best = score;

        if !self.announced && score > self.to_beat {
            self.announced = true;
            return (true, Some(GameEvent::NewHighScore { score }));
        }
        (true, None)
    }
}
