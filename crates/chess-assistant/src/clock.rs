//! Chess clock with per-side countdown.

use chess_core::Color;
use std::time::{Duration, Instant};

/// Two countdown timers, one running at a time.
///
/// Time is charged explicitly through [`ChessClock::tick`] so the caller
/// decides how often the display is refreshed.
#[derive(Debug, Clone)]
pub struct ChessClock {
    remaining_ms: [u64; 2],
    increment_ms: u64,
    turn: Color,
    running_since: Option<Instant>,
    flagged: Option<Color>,
}

fn slot(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

impl ChessClock {
    /// Creates a stopped clock with `time_ms` per side, white to move.
    pub fn new(time_ms: u64, increment_ms: u64) -> Self {
        Self {
            remaining_ms: [time_ms; 2],
            increment_ms,
            turn: Color::White,
            running_since: None,
            flagged: None,
        }
    }

    /// Starts (or restarts) the clock of the side to move.
    pub fn resume(&mut self, now: Instant) {
        if self.flagged.is_none() && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Stops the running clock after charging elapsed time.
    pub fn pause(&mut self, now: Instant) {
        self.tick(now);
        self.running_since = None;
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// The side whose clock is (or would be) running.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The side that ran out of time, if any.
    pub fn flagged(&self) -> Option<Color> {
        self.flagged
    }

    pub fn remaining(&self, color: Color) -> Duration {
        Duration::from_millis(self.remaining_ms[slot(color)])
    }

    /// Charges the time elapsed since the last tick to the side to move.
    ///
    /// Returns the side whose time just ran out.
    pub fn tick(&mut self, now: Instant) -> Option<Color> {
        let since = self.running_since?;
        let elapsed = now.saturating_duration_since(since).as_millis() as u64;
        let remaining = &mut self.remaining_ms[slot(self.turn)];
        if *remaining > elapsed {
            *remaining -= elapsed;
            self.running_since = Some(now);
            None
        } else {
            *remaining = 0;
            self.running_since = None;
            self.flagged = Some(self.turn);
            self.flagged
        }
    }

    /// Ends the mover's turn: charges time, adds the increment and starts the
    /// opponent's clock.
    pub fn switch(&mut self, now: Instant) -> Option<Color> {
        if let Some(flagged) = self.tick(now) {
            return Some(flagged);
        }
        self.remaining_ms[slot(self.turn)] += self.increment_ms;
        self.turn = self.turn.opposite();
        None
    }

    /// Sets the side to move without charging time, e.g. after a take-back.
    pub fn set_turn(&mut self, color: Color, now: Instant) {
        self.tick(now);
        self.turn = color;
        if self.running_since.is_some() {
            self.running_since = Some(now);
        }
    }

    /// Display text for one side.
    pub fn display(&self, color: Color) -> String {
        format_time(self.remaining_ms[slot(color)])
    }
}

/// Formats remaining time for a four-digit display.
///
/// Above 99 minutes only minutes are shown, above 9 seconds `MM:SS`, and in
/// the last ten seconds seconds with tenths.
pub fn format_time(time_ms: u64) -> String {
    let seconds = time_ms / 1000;
    let minutes = seconds / 60;
    if minutes > 99 {
        return format!("{:>4}", minutes);
    }
    if seconds > 9 {
        return format!("{:>2}:{:02}", minutes, seconds % 60);
    }
    format!("  {}.{}", seconds, time_ms / 100 % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60 * 1000;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(5 * MINUTE), " 5:00");
        assert_eq!(format_time(10 * MINUTE + 2_000), "10:02");
        assert_eq!(format_time(99 * MINUTE + 59_000), "99:59");
        assert_eq!(format_time(100 * MINUTE), " 100");
        assert_eq!(format_time(1234 * MINUTE), "1234");
        assert_eq!(format_time(10_000), " 0:10");
        assert_eq!(format_time(9_999), "  9.9");
        assert_eq!(format_time(2_500), "  2.5");
        assert_eq!(format_time(0), "  0.0");
    }

    #[test]
    fn test_runs_only_for_side_to_move() {
        let start = Instant::now();
        let mut clock = ChessClock::new(5 * MINUTE, 0);
        assert!(!clock.is_running());

        clock.resume(start);
        assert_eq!(clock.tick(start + Duration::from_secs(3)), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_millis(5 * MINUTE - 3_000));
        assert_eq!(clock.remaining(Color::Black), Duration::from_millis(5 * MINUTE));

        assert_eq!(clock.switch(start + Duration::from_secs(4)), None);
        assert_eq!(clock.turn(), Color::Black);
        clock.tick(start + Duration::from_secs(6));
        assert_eq!(clock.remaining(Color::White), Duration::from_millis(5 * MINUTE - 4_000));
        assert_eq!(clock.remaining(Color::Black), Duration::from_millis(5 * MINUTE - 2_000));
    }

    #[test]
    fn test_increment_goes_to_mover() {
        let start = Instant::now();
        let mut clock = ChessClock::new(MINUTE, 2_000);
        clock.resume(start);
        clock.switch(start + Duration::from_secs(1));
        assert_eq!(clock.remaining(Color::White), Duration::from_millis(MINUTE + 1_000));
        assert_eq!(clock.display(Color::White), " 1:01");
    }

    #[test]
    fn test_pause_stops_charging() {
        let start = Instant::now();
        let mut clock = ChessClock::new(MINUTE, 0);
        clock.resume(start);
        clock.pause(start + Duration::from_secs(1));
        assert!(!clock.is_running());
        assert_eq!(clock.tick(start + Duration::from_secs(30)), None);
        assert_eq!(clock.remaining(Color::White), Duration::from_millis(MINUTE - 1_000));

        clock.resume(start + Duration::from_secs(30));
        clock.tick(start + Duration::from_secs(32));
        assert_eq!(clock.remaining(Color::White), Duration::from_millis(MINUTE - 3_000));
    }

    #[test]
    fn test_flag_fall() {
        let start = Instant::now();
        let mut clock = ChessClock::new(1_000, 0);
        clock.resume(start);
        assert_eq!(clock.tick(start + Duration::from_millis(1_500)), Some(Color::White));
        assert_eq!(clock.flagged(), Some(Color::White));
        assert_eq!(clock.display(Color::White), "  0.0");
        assert!(!clock.is_running());

        clock.resume(start + Duration::from_secs(2));
        assert!(!clock.is_running());
    }
}
