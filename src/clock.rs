use crate::logic::board::Color;
use serde::{Deserialize, Serialize};

/// Default time budget per side: ten minutes.
pub const DEFAULT_TIME_MS: u64 = 10 * 60 * 1000;

/// Two independent countdown timers, one per side.
///
/// The clock is armed by `start()` on the first move of the game and handed
/// to the other side by `press()` on every committed move. `tick()` is the
/// display-refresh deduction; `reconcile()` is the authoritative commit-time
/// correction and wins on any discrepancy between the two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    remaining: [u64; 2],
    active: Color,
    running: bool,
    initial_ms: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_MS)
    }
}

impl Clock {
    #[must_use]
    pub const fn new(initial_ms: u64) -> Self {
        Self {
            remaining: [initial_ms, initial_ms],
            active: Color::White,
            running: false,
            initial_ms,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn active(&self) -> Color {
        self.active
    }

    #[must_use]
    pub const fn remaining(&self, color: Color) -> u64 {
        self.remaining[color.index()]
    }

    /// Deducts `elapsed_ms` from the active side. Returns the flagged color
    /// exactly once when its time reaches zero; once expired, further ticks
    /// for that color are no-ops until `reset()`.
    pub fn tick(&mut self, elapsed_ms: u64) -> Option<Color> {
        if !self.running {
            return None;
        }

        let slot = &mut self.remaining[self.active.index()];
        if *slot == 0 {
            return None;
        }

        // Saturating: time never goes negative.
        *slot = slot.saturating_sub(elapsed_ms);
        if *slot == 0 {
            self.running = false;
            return Some(self.active);
        }
        None
    }

    /// Hands the clock to the other side after a committed move. The mover's
    /// side must match `mover`; mismatches are ignored.
    pub fn press(&mut self, mover: Color) {
        if self.active == mover {
            self.active = mover.opposite();
        }
    }

    /// Authoritative correction of a side's remaining time, e.g. from the
    /// wall-clock reconciliation performed on move commit.
    pub fn reconcile(&mut self, color: Color, remaining_ms: u64) {
        self.remaining[color.index()] = remaining_ms;
    }

    /// Re-arms both sides to the full configured budget.
    pub fn reset(&mut self) {
        self.remaining = [self.initial_ms, self.initial_ms];
        self.active = Color::White;
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_on_second_tick() {
        let mut clock = Clock::new(200);
        clock.start();

        // Two ticks of 100ms against 200ms: flag falls on the second tick,
        // never before the first.
        assert_eq!(clock.tick(100), None);
        assert_eq!(clock.tick(100), Some(Color::White));
    }

    #[test]
    fn test_expired_clock_ticks_are_noops() {
        let mut clock = Clock::new(100);
        clock.start();
        assert_eq!(clock.tick(150), Some(Color::White));
        assert_eq!(clock.remaining(Color::White), 0);
        // The event fires exactly once.
        assert_eq!(clock.tick(100), None);
        assert_eq!(clock.remaining(Color::White), 0);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut clock = Clock::new(200);
        assert_eq!(clock.tick(500), None);
        assert_eq!(clock.remaining(Color::White), 200);
    }

    #[test]
    fn test_press_switches_active_side() {
        let mut clock = Clock::new(1000);
        clock.start();
        clock.tick(100);
        clock.press(Color::White);
        assert_eq!(clock.active(), Color::Black);
        clock.tick(300);
        assert_eq!(clock.remaining(Color::White), 900);
        assert_eq!(clock.remaining(Color::Black), 700);
    }

    #[test]
    fn test_stale_press_is_ignored() {
        let mut clock = Clock::new(1000);
        clock.start();
        clock.press(Color::White);
        // A duplicate press from the same mover must not flip back.
        clock.press(Color::White);
        assert_eq!(clock.active(), Color::Black);
    }

    #[test]
    fn test_reset_rearms_full_budget() {
        let mut clock = Clock::new(300);
        clock.start();
        clock.tick(300);
        clock.reset();
        assert_eq!(clock.remaining(Color::White), 300);
        assert_eq!(clock.remaining(Color::Black), 300);
        assert!(!clock.is_running());
        assert_eq!(clock.active(), Color::White);
    }

    #[test]
    fn test_reconcile_overrides_ticks() {
        let mut clock = Clock::new(1000);
        clock.start();
        clock.tick(100);
        // Commit-time reconciliation is authoritative.
        clock.reconcile(Color::White, 850);
        assert_eq!(clock.remaining(Color::White), 850);
    }
}
