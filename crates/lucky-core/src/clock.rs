//! Season clock: maps wall-clock time to a season window.
//!
//! Seasons are fixed-length windows aligned to a Monday anchor. The window
//! containing `now` is a pure function of `now` and the [`SeasonConfig`];
//! nothing about it is stored except the id the record was last seen in.
//!
//! # Design Principles
//!
//! - `now` is always supplied by the caller; the clock never reads time.
//! - All second arithmetic is checked; timestamps outside chrono's range
//!   are an error rather than a wrap.

use chrono::{DateTime, Utc};

use lucky_types::SeasonWindow;

use crate::config::SeasonConfig;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Errors that can occur during season clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Invalid season configuration (e.g. zero duration).
    #[error("invalid season configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The computed window falls outside the representable time range.
    #[error("season window out of range for timestamp {timestamp}")]
    OutOfRange {
        /// Unix seconds that could not be placed in a window.
        timestamp: i64,
    },
}

/// Deterministic season window calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonClock {
    anchor: i64,
    duration_seconds: i64,
}

impl SeasonClock {
    /// Create a clock from the season configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the duration is zero or too
    /// large to express in seconds.
    pub fn new(config: &SeasonConfig) -> Result<Self, ClockError> {
        let duration_seconds = i64::from(config.duration_days)
            .checked_mul(SECONDS_PER_DAY)
            .filter(|d| *d > 0)
            .ok_or_else(|| ClockError::InvalidConfig {
                reason: "duration_days must be between 1 and i64::MAX / 86400".to_owned(),
            })?;
        Ok(Self {
            anchor: config.anchor_unix_seconds,
            duration_seconds,
        })
    }

    /// Season length in seconds.
    pub const fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    /// The window containing `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::OutOfRange`] when the window boundaries cannot
    /// be represented.
    pub fn window_at(&self, now: DateTime<Utc>) -> Result<SeasonWindow, ClockError> {
        let timestamp = now.timestamp();
        let out_of_range = || ClockError::OutOfRange { timestamp };

        let index = timestamp
            .checked_sub(self.anchor)
            .and_then(|offset| offset.checked_div_euclid(self.duration_seconds))
            .ok_or_else(out_of_range)?;
        let start = index
            .checked_mul(self.duration_seconds)
            .and_then(|s| s.checked_add(self.anchor))
            .ok_or_else(out_of_range)?;
        let end = start
            .checked_add(self.duration_seconds)
            .ok_or_else(out_of_range)?;

        let starts_at = DateTime::<Utc>::from_timestamp(start, 0).ok_or_else(out_of_range)?;
        let ends_at = DateTime::<Utc>::from_timestamp(end, 0).ok_or_else(out_of_range)?;

        Ok(SeasonWindow {
            id: format!("season-{}", starts_at.format("%Y-%m-%d")),
            starts_at,
            ends_at,
        })
    }
}
