//! One player's game, paced by frame timestamps
//!
//! The host calls [`Session::on_frame`] once per presentation frame with a
//! monotonic timestamp and forwards decoded key presses to
//! [`Session::handle_intent`]. Both run on the same task, so the state needs no
//! locking.

use std::time::Duration;

use super::{
    action::{Direction, Intent},
    engine::GameEngine,
    event::GameEvent,
    record::HighScore,
    state::{GameState, Position, Snake},
};

/// What happened during one frame callback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the simulation advanced this frame
    pub ticked: bool,
    /// Events from the tick, in the order they happened
    pub events: Vec<GameEvent>,
    /// The best score moved and should be written back to storage
    pub high_score_changed: bool,
}

/// Read-only view handed to renderers
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Position,
    pub direction: Direction,
    pub grid_size: usize,
    pub score: u32,
    pub high_score: u32,
    /// This game has beaten the record it started against
    pub new_high_score: bool,
    pub level: u32,
    pub game_over: bool,
}

pub struct Session {
    engine: GameEngine,
    state: GameState,
    record: HighScore,
}

impl Session {
    /// Start the first game at `now` with the persisted record
    pub fn new(mut engine: GameEngine, persisted_high_score: u32, now: Duration) -> Self {
        let state = engine.reset(now);
        Self {
            engine,
            state,
            record: HighScore::new(persisted_high_score),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.record.best()
    }

    /// Apply a player intent; returns whether it changed anything
    pub fn handle_intent(&mut self, intent: Intent, now: Duration) -> bool {
        match intent {
            Intent::Turn(direction) => self.engine.set_direction(&mut self.state, direction),
            Intent::Reset => {
                self.reset(now);
                true
            }
        }
    }

    pub fn reset(&mut self, now: Duration) {
        self.state = self.engine.reset(now);
        self.record.start_game();
        tracing::debug!(high_score = self.record.best(), "new game");
    }

    /// Advance one step and fold the score into the record
    pub fn tick(&mut self) -> (Vec<GameEvent>, bool) {
        let mut events = self.engine.tick(&mut self.state);
        let (changed, announcement) = self.record.observe(self.state.score);
        if let Some(event) = announcement {
            tracing::info!(score = event.score(), "new high score");
            events.push(event);
        }
        (events, changed)
    }

    /// Frame callback: tick when the current interval has elapsed since the last tick
    pub fn on_frame(&mut self, now: Duration) -> FrameReport {
        if self.state.game_over {
            return FrameReport::default();
        }

        let elapsed = now.saturating_sub(self.state.last_tick);
        if elapsed < self.state.current_speed {
            return FrameReport::default();
        }

        let (events, high_score_changed) = self.tick();
        self.state.last_tick = now;

        FrameReport {
            ticked: true,
            events,
            high_score_changed,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let level_every = self.engine.config().level_every;
        Snapshot {
            snake: &self.state.snake,
            food: self.state.food,
            direction: self.state.direction,
            grid_size: self.state.grid_size,
            score: self.state.score,
            high_score: self.record.best(),
            new_high_score: self.record.beaten_this_game(),
            level: self.state.level(level_every),
            game_over: self.state.game_over,
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn session(high_score: u32) -> Session {
        let engine = GameEngine::with_seed(GameConfig::default(), 11).unwrap();
        Session::new(engine, high_score, Duration::ZERO)
    }

    fn food_ahead(session: &mut Session) {
        let state = session.state_mut();
        state.food = state.snake.head().wrapped_step(state.next_direction, state.grid_size);
    }

    fn food_away(session: &mut Session) {
        let state = session.state_mut();
        state.food = Position::new(0, 0);
    }

    #[test]
    fn test_no_tick_before_interval() {
        let mut session = session(0);
        food_away(&mut session);

        assert!(!session.on_frame(ms(16)).ticked);
        assert!(!session.on_frame(ms(149)).ticked);
        assert_eq!(session.state().snake.head(), Position::new(12, 12));

        let report = session.on_frame(ms(150));
        assert!(report.ticked);
        assert_eq!(session.state().last_tick, ms(150));
        assert_eq!(session.state().snake.head(), Position::new(13, 12));
    }

    #[test]
    fn test_one_tick_per_frame_even_after_a_stall() {
        let mut session = session(0);
        food_away(&mut session);

        assert!(session.on_frame(ms(1_000)).ticked);
        assert_eq!(session.state().snake.head(), Position::new(13, 12));
        assert!(!session.on_frame(ms(1_100)).ticked);
        assert!(session.on_frame(ms(1_150)).ticked);
    }

    #[test]
    fn test_turn_waits_for_next_tick() {
        let mut session = session(0);
        food_away(&mut session);

        assert!(session.handle_intent(Intent::Turn(Direction::Down), ms(10)));
        assert_eq!(session.state().direction, Direction::Right);

        session.on_frame(ms(150));
        assert_eq!(session.state().direction, Direction::Down);
        assert_eq!(session.state().snake.head(), Position::new(12, 13));
    }

    #[test]
    fn test_reverse_turn_rejected() {
        let mut session = session(0);
        assert!(!session.handle_intent(Intent::Turn(Direction::Left), ms(10)));
        assert_eq!(session.state().next_direction, Direction::Right);
    }

    #[test]
    fn test_events_and_record() {
        let mut session = session(0);
        food_ahead(&mut session);

        let report = session.on_frame(ms(150));
        assert_eq!(
            report.events,
            vec![
                GameEvent::FoodEaten { score: 1 },
                GameEvent::NewHighScore { score: 1 }
            ]
        );
        assert!(report.high_score_changed);
        assert_eq!(session.high_score(), 1);

        food_ahead(&mut session);
        let report = session.on_frame(ms(300));
        assert_eq!(report.events, vec![GameEvent::FoodEaten { score: 2 }]);
        assert!(report.high_score_changed);

        food_away(&mut session);
        let report = session.on_frame(ms(450));
        assert!(report.ticked);
        assert!(report.events.is_empty());
        assert!(!report.high_score_changed);
    }

    #[test]
    fn test_no_announcement_below_persisted_record() {
        let mut session = session(5);
        food_ahead(&mut session);

        let report = session.on_frame(ms(150));
        assert_eq!(report.events, vec![GameEvent::FoodEaten { score: 1 }]);
        assert!(!report.high_score_changed);
        assert_eq!(session.high_score(), 5);
    }

    #[test]
    fn test_game_over_stops_ticking_until_reset() {
        let mut session = session(0);
        session.state_mut().game_over = true;
        let before = session.state().clone();

        assert_eq!(session.on_frame(ms(10_000)), FrameReport::default());
        assert_eq!(session.state(), &before);
        assert!(!session.handle_intent(Intent::Turn(Direction::Up), ms(10_000)));

        assert!(session.handle_intent(Intent::Reset, ms(10_000)));
        let state = session.state();
        assert!(!state.game_over);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.current_speed, ms(150));
        assert_eq!(state.last_tick, ms(10_000));

        assert!(!session.on_frame(ms(10_100)).ticked);
        assert!(session.on_frame(ms(10_150)).ticked);
    }

    #[test]
    fn test_level_up_speeds_up_cadence() {
        let mut session = session(100);
        session.state_mut().score = 9;
        food_ahead(&mut session);

        let report = session.on_frame(ms(150));
        assert_eq!(
            report.events,
            vec![GameEvent::LeveledUp {
                score: 10,
                level: 2
            }]
        );
        assert_eq!(session.state().current_speed, ms(135));

        food_away(&mut session);
        assert!(!session.on_frame(ms(284)).ticked);
        assert!(session.on_frame(ms(285)).ticked);
    }

    #[test]
    fn test_snapshot() {
        let mut session = session(3);
        session.state_mut().score = 12;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.snake.len(), 3);
        assert_eq!(snapshot.direction, Direction::Right);
        assert_eq!(snapshot.score, 12);
        assert_eq!(snapshot.high_score, 3);
        assert_eq!(snapshot.level, 2);
        assert_eq!(snapshot.grid_size, 25);
        assert!(!snapshot.new_high_score);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_snapshot_flags_only_a_beaten_record() {
        let mut session = session(1);
        food_ahead(&mut session);
        session.on_frame(ms(150));
        assert_eq!(session.snapshot().score, 1);
        assert_eq!(session.snapshot().high_score, 1);
        assert!(!session.snapshot().new_high_score);

        food_ahead(&mut session);
        session.on_frame(ms(300));
        assert!(session.snapshot().new_high_score);

        session.reset(ms(400));
        assert!(!session.snapshot().new_high_score);
    }
}
