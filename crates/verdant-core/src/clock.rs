//! Game clock — the day cycle that drives thermal response and insect
//! day/night affinity.
//!
//! Time advances in whole game-minutes. One game day lasts
//! `day_cycle_seconds` of scaled real time, so a minute is
//! `day_cycle_seconds / 1440` seconds.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Named part of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPeriod {
    Night,
    Dawn,
    Morning,
    Noon,
    GoldenHour,
    Dusk,
}

impl DayPeriod {
    /// Dawn through golden hour count as day; dusk and night do not.
    pub fn is_daytime(&self) -> bool {
        matches!(
            self,
            DayPeriod::Dawn | DayPeriod::Morning | DayPeriod::Noon | DayPeriod::GoldenHour
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPeriod::Night => "night",
            DayPeriod::Dawn => "dawn",
            DayPeriod::Morning => "morning",
            DayPeriod::Noon => "noon",
            DayPeriod::GoldenHour => "golden_hour",
            DayPeriod::Dusk => "dusk",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour at which each period ends. Hours past `dusk_end` wrap to night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodBoundaries {
    pub night_end: f64,
    pub dawn_end: f64,
    pub morning_end: f64,
    pub noon_end: f64,
    pub golden_hour_end: f64,
    pub dusk_end: f64,
}

impl Default for PeriodBoundaries {
    fn default() -> Self {
        Self {
            night_end: 5.5,
            dawn_end: 7.0,
            morning_end: 10.0,
            noon_end: 14.0,
            golden_hour_end: 17.0,
            dusk_end: 19.5,
        }
    }
}

impl PeriodBoundaries {
    pub fn period_at(&self, hour: f64) -> DayPeriod {
        if hour < self.night_end {
            DayPeriod::Night
        } else if hour < self.dawn_end {
            DayPeriod::Dawn
        } else if hour < self.morning_end {
            DayPeriod::Morning
        } else if hour < self.noon_end {
            DayPeriod::Noon
        } else if hour < self.golden_hour_end {
            DayPeriod::GoldenHour
        } else if hour < self.dusk_end {
            DayPeriod::Dusk
        } else {
            DayPeriod::Night
        }
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let ordered = [
            self.night_end,
            self.dawn_end,
            self.morning_end,
            self.noon_end,
            self.golden_hour_end,
            self.dusk_end,
        ];
        let in_range = ordered.iter().all(|h| (0.0..=24.0).contains(h));
        let increasing = ordered.windows(2).all(|w| w[0] < w[1]);
        if in_range && increasing {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                field: "clock.boundaries",
                reason: "period boundaries must increase within 0..=24 hours".into(),
            })
        }
    }
}

/// Clock tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Real seconds per game day at speed 1 (default: 300).
    pub day_cycle_seconds: f64,
    /// Starting time of day as a fraction of the day (default: 0.25, 06:00).
    pub start_time: f64,
    pub boundaries: PeriodBoundaries,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            day_cycle_seconds: 300.0,
            start_time: 0.25,
            boundaries: PeriodBoundaries::default(),
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.day_cycle_seconds > 0.0) {
            return Err(ConfigError::NotPositive {
                field: "clock.day_cycle_seconds",
                value: self.day_cycle_seconds,
            }
            .into());
        }
        if !(0.0..1.0).contains(&self.start_time) {
            return Err(ConfigError::Invalid {
                field: "clock.start_time",
                reason: format!("{} is not a fraction of a day", self.start_time),
            }
            .into());
        }
        self.boundaries.validate()?;
        Ok(())
    }
}

/// Something the clock noticed while advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    HourPassed(u32),
    PeriodChanged { old: DayPeriod, new: DayPeriod },
}

/// Minute-resolution day clock.
#[derive(Debug, Clone)]
pub struct GameClock {
    config: ClockConfig,
    minute_of_day: u32,
    day: u64,
    accumulated: f64,
    period: DayPeriod,
}

impl GameClock {
    pub fn new(config: ClockConfig) -> Self {
        let minute_of_day =
            ((config.start_time * MINUTES_PER_DAY as f64) as u32).min(MINUTES_PER_DAY - 1);
        let period = config.boundaries.period_at(minute_of_day as f64 / 60.0);
        Self {
            config,
            minute_of_day,
            day: 0,
            accumulated: 0.0,
            period,
        }
    }

    fn seconds_per_minute(&self) -> f64 {
        self.config.day_cycle_seconds / MINUTES_PER_DAY as f64
    }

    /// Advance by `scaled_dt` seconds (already multiplied by game speed).
    /// Returns hour and period transitions in the order they happened.
    pub fn advance(&mut self, scaled_dt: f64) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        if !(scaled_dt > 0.0) {
            return events;
        }
        self.accumulated += scaled_dt;
        let step = self.seconds_per_minute();
        while self.accumulated >= step {
            self.accumulated -= step;
            self.advance_minute(&mut events);
        }
        events
    }

    fn advance_minute(&mut self, events: &mut Vec<ClockEvent>) {
        let last_hour = self.hour();
        self.minute_of_day += 1;
        if self.minute_of_day >= MINUTES_PER_DAY {
            self.minute_of_day = 0;
            self.day += 1;
        }
        let hour = self.hour();
        if hour != last_hour {
            events.push(ClockEvent::HourPassed(hour));
        }
        let period = self.config.boundaries.period_at(self.fractional_hour());
        if period != self.period {
            events.push(ClockEvent::PeriodChanged {
                old: self.period,
                new: period,
            });
            self.period = period;
        }
    }

    pub fn hour(&self) -> u32 {
        self.minute_of_day / 60
    }

    pub fn minute(&self) -> u32 {
        self.minute_of_day % 60
    }

    pub fn fractional_hour(&self) -> f64 {
        self.minute_of_day as f64 / 60.0
    }

    /// Fraction of the day elapsed, in [0, 1).
    pub fn time_normalized(&self) -> f64 {
        self.minute_of_day as f64 / MINUTES_PER_DAY as f64
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn period(&self) -> DayPeriod {
        self.period
    }

    pub fn is_daytime(&self) -> bool {
        self.period.is_daytime()
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clock_starts_at_six_in_the_dawn() {
        let clock = GameClock::new(ClockConfig::default());
        assert_eq!(clock.hour(), 6);
        assert_eq!(clock.period(), DayPeriod::Dawn);
        assert!(clock.is_daytime());
    }

    #[test]
    fn one_hour_of_game_time_emits_one_hour_event() {
        let mut clock = GameClock::new(ClockConfig::default());
        // 300 s per day is 12.5 s per game hour.
        let events = clock.advance(12.6);
        let hours: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ClockEvent::HourPassed(h) => Some(*h),
                _ => None,
            })
            .collect();
        assert_eq!(hours, vec![7]);
        // 07:00 is the start of morning.
        assert!(events.contains(&ClockEvent::PeriodChanged {
            old: DayPeriod::Dawn,
            new: DayPeriod::Morning,
        }));
    }

    #[test]
    fn full_day_wraps_and_counts() {
        let mut clock = GameClock::new(ClockConfig::default());
        let events = clock.advance(300.0 + 0.01);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour(), 6);
        let hour_events = events
            .iter()
            .filter(|e| matches!(e, ClockEvent::HourPassed(_)))
            .count();
        assert_eq!(hour_events, 24);
    }

    #[test]
    fn period_table_matches_boundaries() {
        let b = PeriodBoundaries::default();
        assert_eq!(b.period_at(0.0), DayPeriod::Night);
        assert_eq!(b.period_at(5.5), DayPeriod::Dawn);
        assert_eq!(b.period_at(12.0), DayPeriod::Noon);
        assert_eq!(b.period_at(16.9), DayPeriod::GoldenHour);
        assert_eq!(b.period_at(18.0), DayPeriod::Dusk);
        assert_eq!(b.period_at(23.0), DayPeriod::Night);
        assert!(!DayPeriod::Dusk.is_daytime());
    }

    #[test]
    fn non_positive_advance_is_ignored() {
        let mut clock = GameClock::new(ClockConfig::default());
        assert!(clock.advance(0.0).is_empty());
        assert!(clock.advance(-3.0).is_empty());
        assert_eq!(clock.minute(), 0);
    }

    #[test]
    fn unordered_boundaries_fail_validation() {
        let mut config = ClockConfig::default();
        config.boundaries.noon_end = 8.0;
        assert!(config.validate().is_err());
        assert!(ClockConfig::default().validate().is_ok());
    }
}
