//! Elapsed-time tracking for a running match.
//!
//! The clock never accumulates timer callbacks: elapsed time is always
//! recomputed from a stored base plus the wall-clock distance to an anchor
//! taken when the clock last started running. A process suspended mid-match
//! therefore resumes with the correct elapsed time. Callers inject `now` so
//! the arithmetic stays testable.

use std::time::SystemTime;

use crate::dao::models::ClockStateEntity;

/// Match half the clock is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    /// First half.
    First,
    /// Second half.
    Second,
}

impl Half {
    /// Half number as displayed (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Half::First => 1,
            Half::Second => 2,
        }
    }

    /// Parse a displayed half number.
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            1 => Some(Half::First),
            2 => Some(Half::Second),
            _ => None,
        }
    }
}

/// Pausable elapsed-seconds tracker owned by the controlling device's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    stored_secs: u64,
    running: bool,
    half: Half,
    minutes_per_half: u32,
    anchor: Option<SystemTime>,
}

impl GameClock {
    /// Fresh clock at zero elapsed in the first half, not running.
    pub fn new(minutes_per_half: u32) -> Self {
        Self {
            stored_secs: 0,
            running: false,
            half: Half::First,
            minutes_per_half,
            anchor: None,
        }
    }

    /// Elapsed match seconds at `now`.
    pub fn elapsed(&self, now: SystemTime) -> u64 {
        let live = match (self.running, self.anchor) {
            (true, Some(anchor)) => now
                .duration_since(anchor)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            _ => 0,
        };
        self.stored_secs + live
    }

    /// Read the derived elapsed time without mutating anything.
    pub fn tick(&self, now: SystemTime) -> u64 {
        self.elapsed(now)
    }

    /// Start (or restart) the clock at `now`. No-op while already running.
    pub fn start(&mut self, now: SystemTime) {
        if !self.running {
            self.running = true;
            self.anchor = Some(now);
        }
    }

    /// Pause the clock, folding the live stretch into the stored base.
    pub fn pause(&mut self, now: SystemTime) {
        if self.running {
            self.stored_secs = self.elapsed(now);
            self.running = false;
            self.anchor = None;
        }
    }

    /// Resume a paused clock.
    pub fn resume(&mut self, now: SystemTime) {
        self.start(now);
    }

    /// Move to the second half. Elapsed seconds keep counting continuously;
    /// already in the second half this is a no-op.
    pub fn advance_half(&mut self) {
        self.half = Half::Second;
    }

    /// Whether the clock is currently running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current half.
    pub fn half(&self) -> Half {
        self.half
    }

    /// Configured half length in minutes (authorial input, never derived).
    pub fn minutes_per_half(&self) -> u32 {
        self.minutes_per_half
    }
}

impl From<&GameClock> for ClockStateEntity {
    fn from(value: &GameClock) -> Self {
        Self {
            elapsed_secs: value.stored_secs,
            running: value.running,
            half: value.half.number(),
            minutes_per_half: value.minutes_per_half,
            anchor: value.anchor,
        }
    }
}

impl From<ClockStateEntity> for GameClock {
    fn from(value: ClockStateEntity) -> Self {
        let running = value.running && value.anchor.is_some();
        Self {
            stored_secs: value.elapsed_secs,
            running,
            half: Half::from_number(value.half).unwrap_or(Half::First),
            minutes_per_half: value.minutes_per_half,
            anchor: if running { value.anchor } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn at(base: SystemTime, secs: u64) -> SystemTime {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn elapsed_is_zero_before_start() {
        let clock = GameClock::new(25);
        assert_eq!(clock.elapsed(SystemTime::now()), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn elapsed_tracks_wall_clock_while_running() {
        let base = SystemTime::UNIX_EPOCH;
        let mut clock = GameClock::new(25);
        clock.start(base);
        assert_eq!(clock.elapsed(at(base, 90)), 90);
        assert_eq!(clock.elapsed(at(base, 91)), 91);
    }

    #[test]
    fn elapsed_is_monotonic_within_a_run() {
        let base = SystemTime::UNIX_EPOCH;
        let mut clock = GameClock::new(25);
        clock.start(base);
        let mut last = 0;
        for secs in [1, 5, 5, 60, 3600] {
            let read = clock.elapsed(at(base, secs));
            assert!(read >= last);
            last = read;
        }
    }

    #[test]
    fn pause_freezes_elapsed() {
        let base = SystemTime::UNIX_EPOCH;
        let mut clock = GameClock::new(25);
        clock.start(base);
        clock.pause(at(base, 120));
        // No advance while paused, regardless of how much wall time passes.
        assert_eq!(clock.elapsed(at(base, 5000)), 120);

        clock.resume(at(base, 6000));
        assert_eq!(clock.elapsed(at(base, 6030)), 150);
    }

    #[test]
    fn reload_mid_run_recovers_suspended_time() {
        let base = SystemTime::UNIX_EPOCH;
        let mut clock = GameClock::new(25);
        clock.start(base);

        // Persist while running, "crash", rebuild from the entity.
        let entity = ClockStateEntity::from(&clock);
        let restored = GameClock::from(entity);
        assert!(restored.is_running());
        // Time spent suspended still counts: the anchor survived.
        assert_eq!(restored.elapsed(at(base, 300)), 300);
    }

    #[test]
    fn advance_half_keeps_elapsed_continuous() {
        let base = SystemTime::UNIX_EPOCH;
        let mut clock = GameClock::new(25);
        clock.start(base);
        clock.advance_half();
        assert_eq!(clock.half(), Half::Second);
        assert_eq!(clock.elapsed(at(base, 10)), 10);
        clock.advance_half();
        assert_eq!(clock.half(), Half::Second);
    }
}
