use chrono::{Days, Local, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::DayMode;

/// The part of the clock that is saved with the game.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClockMarker {
    /// Day key of the last processed daily rollover.
    pub last_day: Option<NaiveDate>,
    /// Simulated seconds since the game began.
    pub accumulated_secs: f64,
}

/// Tracks simulation time and detects day boundaries.
///
/// Day detection is a debounce: the current day key is compared against the
/// last processed one. In wall-clock mode the key is the local date shifted
/// back by the day-start hour; in accumulated mode it is the number of whole
/// days of simulated time, mapped onto a calendar date.
#[derive(Debug, Clone)]
pub struct SimClock {
    mode: DayMode,
    tick: u64,
    accumulated_secs: f64,
    last_day: Option<NaiveDate>,
    wall_override: Option<NaiveDateTime>,
}

impl SimClock {
    /// Create a clock at zero elapsed time.
    pub fn new(mode: DayMode) -> Self {
        Self {
            mode,
            tick: 0,
            accumulated_secs: 0.0,
            last_day: None,
            wall_override: None,
        }
    }

    /// Restore a clock from its saved marker.
    pub fn from_marker(mode: DayMode, marker: ClockMarker) -> Self {
        Self {
            accumulated_secs: marker.accumulated_secs,
            last_day: marker.last_day,
            ..Self::new(mode)
        }
    }

    /// The saved part of the clock.
    pub fn marker(&self) -> ClockMarker {
        ClockMarker {
            last_day: self.last_day,
            accumulated_secs: self.accumulated_secs,
        }
    }

    /// Advance by `dt` seconds. Returns the new tick number.
    pub fn advance(&mut self, dt: f64) -> u64 {
        self.tick += 1;
        self.accumulated_secs += dt.max(0.0);
        self.tick
    }

    /// Move simulated time forward without counting a tick.
    pub fn skip(&mut self, secs: f64) {
        self.accumulated_secs += secs.max(0.0);
    }

    /// Pin "now" to a fixed wall time, or release it with `None`.
    pub fn set_wall_time(&mut self, now: Option<NaiveDateTime>) {
        self.wall_override = now;
    }

    /// Current local wall time, honoring any override.
    pub fn wall_time(&self) -> NaiveDateTime {
        self.wall_override
            .unwrap_or_else(|| Local::now().naive_local())
    }

    /// Number of `advance` calls so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the game began.
    pub fn elapsed_secs(&self) -> f64 {
        self.accumulated_secs
    }

    /// How days are detected.
    pub fn mode(&self) -> DayMode {
        self.mode
    }

    /// Key identifying the current day.
    pub fn day_key(&self) -> NaiveDate {
        match self.mode {
            DayMode::WallClock { day_start_hour } => {
                let now = self.wall_time();
                now.checked_sub_signed(TimeDelta::hours(i64::from(day_start_hour)))
                    .unwrap_or(now)
                    .date()
            }
            DayMode::Accumulated { day_length_secs } => {
                let days = if day_length_secs > 0.0 {
                    (self.accumulated_secs / day_length_secs).floor() as u64
                } else {
                    0
                };
                NaiveDate::default()
                    .checked_add_days(Days::new(days))
                    .unwrap_or(NaiveDate::MAX)
            }
        }
    }

    /// Current hour of the day (0.0..24.0).
    pub fn hour_of_day(&self) -> f64 {
        match self.mode {
            DayMode::WallClock { .. } => {
                let now = self.wall_time();
                f64::from(now.hour())
                    + f64::from(now.minute()) / 60.0
                    + f64::from(now.second()) / 3600.0
            }
            DayMode::Accumulated { day_length_secs } => {
                if day_length_secs <= 0.0 {
                    return 0.0;
                }
                (self.accumulated_secs % day_length_secs) / day_length_secs * 24.0
            }
        }
    }

    /// Whether a new day began since the last check. The first check only
    /// records the current day.
    pub fn check_rollover(&mut self) -> bool {
        let key = self.day_key();
        match self.last_day {
            Some(prev) if prev == key => false,
            Some(_) => {
                self.last_day = Some(key);
                true
            }
            None => {
                self.last_day = Some(key);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulated(day: f64) -> SimClock {
        SimClock::new(DayMode::Accumulated {
            day_length_secs: day,
        })
    }

    #[test]
    fn clock_initial_state() {
        let clock = accumulated(100.0);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert_eq!(clock.hour_of_day(), 0.0);
    }

    #[test]
    fn accumulated_rollover_happens_once_per_day() {
        let mut clock = accumulated(100.0);
        assert!(!clock.check_rollover());
        clock.advance(60.0);
        assert!(!clock.check_rollover());
        clock.advance(60.0);
        assert!(clock.check_rollover());
        assert!(!clock.check_rollover());
    }

    #[test]
    fn zero_advances_never_roll_over() {
        let mut clock = accumulated(10.0);
        clock.check_rollover();
        for _ in 0..1_000 {
            clock.advance(0.0);
            assert!(!clock.check_rollover());
        }
        assert_eq!(clock.tick(), 1_000);
    }

    #[test]
    fn accumulated_hour_wraps() {
        let mut clock = accumulated(240.0);
        clock.advance(250.0);
        assert!((clock.hour_of_day() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wall_clock_day_starts_at_configured_hour() {
        let mut clock = SimClock::new(DayMode::WallClock { day_start_hour: 4 });
        let night = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(3, 30, 0)
            .unwrap();
        clock.set_wall_time(Some(night));
        assert_eq!(clock.day_key(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert!(!clock.check_rollover());

        let morning = night + TimeDelta::hours(1);
        clock.set_wall_time(Some(morning));
        assert!((clock.hour_of_day() - 4.5).abs() < 1e-9);
        assert!(clock.check_rollover());
    }

    #[test]
    fn marker_round_trip() {
        let mut clock = accumulated(50.0);
        clock.advance(120.0);
        clock.check_rollover();
        let restored = SimClock::from_marker(clock.mode(), clock.marker());
        assert_eq!(restored.day_key(), clock.day_key());
        assert_eq!(restored.marker(), clock.marker());
    }
}
