//! Game orchestration: one position, the clock, the opening book and the
//! analysis engine.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_core::{Color, Figure, Move, NotationError, Square};
use chess_engine::{move_to_san, GameResult, Position, Winner};
use chess_openings::OpeningBook;
use thiserror::Error;
use uci::{AnalysisEngine, EngineError};

use crate::clock::ChessClock;

/// Number of most-changed squares considered when detecting a move.
pub const CANDIDATE_SQUARES: usize = 6;

/// Errors reported back to the player.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no game in progress")]
    NotPlaying,
    #[error("the game is over")]
    GameOver,
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("no analysis engine available")]
    NoEngine,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// What happened after a move was played.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport {
    pub san: String,
    pub result: GameResult,
    pub opening: Option<String>,
}

impl fmt::Display for MoveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.san)?;
        if self.result.is_over() {
            write!(f, ", {}", self.result)?;
        }
        if let Some(name) = &self.opening {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

/// A game in progress.
pub struct Game {
    position: Position,
    book: Arc<OpeningBook>,
    engine: Option<Box<dyn AnalysisEngine>>,
    score_timeout: Duration,
    clock: Option<ChessClock>,
    result: Option<GameResult>,
}

impl Game {
    pub fn new(
        book: Arc<OpeningBook>,
        engine: Option<Box<dyn AnalysisEngine>>,
        score_timeout: Duration,
    ) -> Self {
        Self {
            position: Position::new(),
            book,
            engine,
            score_timeout,
            clock: None,
            result: None,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn clock(&self) -> Option<&ChessClock> {
        self.clock.as_ref()
    }

    /// The final result once the game has ended.
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Display text shown while waiting for a game to start.
    pub fn ready_display() -> (&'static str, &'static str) {
        ("ALL", "SET")
    }

    /// Clock display for white and black.
    pub fn display(&self) -> (String, String) {
        match &self.clock {
            Some(clock) => (clock.display(Color::White), clock.display(Color::Black)),
            None => {
                let (white, black) = Self::ready_display();
                (white.to_string(), black.to_string())
            }
        }
    }

    /// Starts a new game with `time_ms` per side.
    pub fn start(&mut self, time_ms: u64, increment_ms: u64, now: Instant) {
        self.position.reset();
        self.result = None;
        let mut clock = ChessClock::new(time_ms, increment_ms);
        clock.resume(now);
        self.clock = Some(clock);
        tracing::info!("Set chess clock to: {}+{}ms", time_ms, increment_ms);
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(clock) = &mut self.clock {
            clock.pause(now);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.result.is_none() {
            if let Some(clock) = &mut self.clock {
                clock.resume(now);
            }
        }
    }

    /// Charges elapsed time. Returns the result if a flag just fell.
    pub fn tick(&mut self, now: Instant) -> Option<GameResult> {
        let flagged = self.clock.as_mut()?.tick(now)?;
        Some(self.flag_fell(flagged))
    }

    fn flag_fell(&mut self, loser: Color) -> GameResult {
        let result = GameResult {
            winner: Winner::from_color(loser.opposite()),
            message: "time".to_string(),
        };
        tracing::info!("{} ran out of time", loser);
        self.result = Some(result.clone());
        result
    }

    fn ensure_playing(&self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        if self.clock.is_none() {
            return Err(GameError::NotPlaying);
        }
        Ok(())
    }

    /// Plays a move given as text, checking it against the legal moves.
    ///
    /// A pawn reaching the last rank without a promotion letter becomes a
    /// queen.
    pub fn play(&mut self, text: &str, now: Instant) -> Result<MoveReport, GameError> {
        self.ensure_playing()?;
        let requested = Move::from_uci(text)?;
        let promoted = if requested.promoted.is_empty() {
            Figure::Queen
        } else {
            requested.promoted
        };
        let legal = self.position.generate_legal_moves();
        let m = legal
            .iter()
            .copied()
            .find(|m| {
                m.from == requested.from
                    && m.to == requested.to
                    && (!m.is_promotion() || m.promoted == promoted)
            })
            .ok_or_else(|| GameError::IllegalMove(text.to_string()))?;
        Ok(self.apply(m, now))
    }

    /// Picks the move implied by the squares whose appearance changed most.
    ///
    /// `changed` is ordered from most to least changed; only the first few are
    /// considered. The move is played only if exactly one legal move has both
    /// its origin and destination among them.
    pub fn consider_move(
        &mut self,
        changed: &[Square],
        now: Instant,
    ) -> Result<Option<MoveReport>, GameError> {
        self.ensure_playing()?;
        let top = &changed[..changed.len().min(CANDIDATE_SQUARES)];
        tracing::info!(
            "{} best candidate squares: {}",
            top.len(),
            top.iter().map(|sq| sq.to_algebraic()).collect::<Vec<_>>().join(", ")
        );

        // Promotions to other figures collapse onto the queen promotion.
        let candidates: Vec<Move> = self
            .position
            .generate_legal_moves()
            .iter()
            .copied()
            .filter(|m| !m.is_promotion() || m.promoted == Figure::Queen)
            .filter(|m| top.contains(&m.from) && top.contains(&m.to))
            .collect();
        tracing::debug!("Candidates: {:?}", candidates);

        match candidates.as_slice() {
            [m] => Ok(Some(self.apply(*m, now))),
            _ => Ok(None),
        }
    }

    fn apply(&mut self, m: Move, now: Instant) -> MoveReport {
        let san = move_to_san(&self.position, m);
        let result = self.position.make_move(m);
        let opening = self.book.find(&self.position).map(str::to_string);

        if let Some(clock) = &mut self.clock {
            if let Some(flagged) = clock.switch(now) {
                let result = self.flag_fell(flagged);
                return MoveReport {
                    san,
                    result,
                    opening,
                };
            }
        }

        if result.is_over() {
            tracing::info!("Game over: {}", result);
            if let Some(clock) = &mut self.clock {
                clock.pause(now);
            }
            self.result = Some(result.clone());
        }
        MoveReport {
            san,
            result,
            opening,
        }
    }

    /// Takes back the last move. Returns false if there was nothing to undo
    /// or a flag has fallen.
    pub fn undo(&mut self, now: Instant) -> bool {
        if self.clock.as_ref().is_some_and(|clock| clock.flagged().is_some()) {
            return false;
        }
        let Some(previous) = self.position.previous() else {
            return false;
        };
        self.position = previous;
        self.result = None;
        let turn = self.position.side_to_move();
        if let Some(clock) = &mut self.clock {
            clock.set_turn(turn, now);
            clock.resume(now);
        }
        true
    }

    /// Asks the engine for a move in the current position, in SAN.
    pub fn best_move(&mut self) -> Result<String, GameError> {
        let engine = self.engine.as_mut().ok_or(GameError::NoEngine)?;
        let m = engine.best_move(&self.position)?;
        let legal = self.position.generate_legal_moves();
        if !legal.contains(&m) {
            return Err(GameError::IllegalMove(m.to_uci()));
        }
        Ok(move_to_san(&self.position, m))
    }

    /// Asks the engine for a score of the current position.
    pub fn score(&mut self) -> Result<Option<f64>, GameError> {
        let engine = self.engine.as_mut().ok_or(GameError::NoEngine)?;
        Ok(engine.score(&self.position, self.score_timeout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_openings::OpeningLine;

    const MINUTE: u64 = 60 * 1000;

    struct FixedEngine {
        reply: &'static str,
    }

    impl AnalysisEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn best_move(&mut self, _position: &Position) -> Result<Move, EngineError> {
            Ok(Move::from_uci(self.reply).unwrap())
        }

        fn score(&mut self, _position: &Position, _timeout: Duration) -> Result<Option<f64>, EngineError> {
            Ok(Some(0.5))
        }
    }

    fn book() -> Arc<OpeningBook> {
        let lines = [OpeningLine::from_pgn("B20", "Sicilian Defense", "1. e4 c5")];
        Arc::new(OpeningBook::from_lines(&lines).unwrap())
    }

    fn started() -> (Game, Instant) {
        let now = Instant::now();
        let mut game = Game::new(book(), None, Duration::from_secs(1));
        game.start(5 * MINUTE, 0, now);
        (game, now)
    }

    fn squares(texts: &[&str]) -> Vec<Square> {
        texts.iter().map(|t| Square::from_algebraic(t).unwrap()).collect()
    }

    #[test]
    fn test_requires_started_game() {
        let mut game = Game::new(book(), None, Duration::from_secs(1));
        assert_eq!(game.display(), ("ALL".to_string(), "SET".to_string()));
        assert!(matches!(game.play("e2e4", Instant::now()), Err(GameError::NotPlaying)));
    }

    #[test]
    fn test_play_reports_opening() {
        let (mut game, now) = started();
        let report = game.play("e2e4", now).unwrap();
        assert_eq!(report.san, "e4");
        assert_eq!(report.opening, None);

        let report = game.play("c7c5", now).unwrap();
        assert_eq!(report.opening.as_deref(), Some("Sicilian Defense"));
        assert_eq!(report.to_string(), "c5 (Sicilian Defense)");
        assert_eq!(game.clock().unwrap().turn(), Color::White);
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let (mut game, now) = started();
        assert!(matches!(game.play("e2e5", now), Err(GameError::IllegalMove(_))));
        assert!(matches!(game.play("e2", now), Err(GameError::Notation(_))));
        assert!(game.position().moves().is_empty());
    }

    #[test]
    fn test_checkmate_ends_game() {
        let (mut game, now) = started();
        for text in ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"] {
            game.play(text, now).unwrap();
        }
        let report = game.play("h5f7", now).unwrap();
        assert_eq!(report.san, "Qxf7#");
        assert_eq!(report.result.winner, Winner::White);
        assert_eq!(report.to_string(), "Qxf7#, white wins by checkmate");
        assert!(matches!(game.play("e8f7", now), Err(GameError::GameOver)));

        assert!(game.undo(now));
        assert!(game.result().is_none());
        assert!(game.play("d2d3", now).is_ok());
    }

    #[test]
    fn test_consider_move_single_candidate() {
        let (mut game, now) = started();
        let report = game
            .consider_move(&squares(&["e2", "e4", "a1", "h8", "d5", "c3", "e3"]), now)
            .unwrap()
            .unwrap();
        assert_eq!(report.san, "e4");
        assert_eq!(game.position().moves().len(), 1);
    }

    #[test]
    fn test_consider_move_ambiguous_or_none() {
        let (mut game, now) = started();
        // e2e3 and e2e4 both fit.
        let changed = squares(&["e2", "e3", "e4"]);
        assert_eq!(game.consider_move(&changed, now).unwrap(), None);
        // Squares beyond the sixth are ignored.
        let changed = squares(&["a3", "b3", "c3", "d3", "f3", "h3", "e2", "e4"]);
        assert_eq!(game.consider_move(&changed, now).unwrap(), None);
        assert!(game.position().moves().is_empty());
    }

    #[test]
    fn test_undo() {
        let (mut game, now) = started();
        assert!(!game.undo(now));
        game.play("e2e4", now).unwrap();
        assert!(game.undo(now));
        assert!(game.position().moves().is_empty());
        assert_eq!(game.clock().unwrap().turn(), Color::White);
    }

    #[test]
    fn test_flag_fall_ends_game() {
        let now = Instant::now();
        let mut game = Game::new(book(), None, Duration::from_secs(1));
        game.start(1_000, 0, now);
        let result = game.tick(now + Duration::from_secs(2)).unwrap();
        assert_eq!(result.winner, Winner::Black);
        assert_eq!(result.message, "time");
        assert!(matches!(game.play("e2e4", now), Err(GameError::GameOver)));
    }

    #[test]
    fn test_no_take_back_after_flag_fall() {
        let now = Instant::now();
        let mut game = Game::new(book(), None, Duration::from_secs(1));
        game.start(2_000, 0, now);
        game.play("e2e4", now + Duration::from_secs(1)).unwrap();
        let result = game.tick(now + Duration::from_secs(4)).unwrap();
        assert_eq!(result.winner, Winner::White);

        assert!(!game.undo(now + Duration::from_secs(5)));
        assert_eq!(game.position().moves().len(), 1);
        assert_eq!(game.result(), Some(&result));
        assert!(matches!(game.play("e7e5", now), Err(GameError::GameOver)));
    }

    #[test]
    fn test_engine_advice() {
        let (mut game, _) = started();
        assert!(matches!(game.best_move(), Err(GameError::NoEngine)));

        let mut game = Game::new(book(), Some(Box::new(FixedEngine { reply: "g1f3" })), Duration::from_secs(1));
        assert_eq!(game.best_move().unwrap(), "Nf3");
        assert_eq!(game.score().unwrap(), Some(0.5));

        let mut game = Game::new(book(), Some(Box::new(FixedEngine { reply: "e2e5" })), Duration::from_secs(1));
        assert!(matches!(game.best_move(), Err(GameError::IllegalMove(_))));
    }
}
