//! Recording duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording duration (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Value object representing how long a session records.
/// Always a positive whole number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordingDuration {
    seconds: u64,
}

impl RecordingDuration {
    /// Create a duration from seconds. Returns `None` for zero.
    pub const fn from_secs(secs: u64) -> Option<Self> {
        if secs == 0 {
            None
        } else {
            Some(Self { seconds: secs })
        }
    }

    /// Default recording duration (10 seconds)
    pub const fn default_duration() -> Self {
        Self {
            seconds: DEFAULT_DURATION_SECS,
        }
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.seconds * 1000
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }
}

impl FromStr for RecordingDuration {
    type Err = DurationParseError;

    /// Parse a duration string.
    /// Supported formats: "30", "30s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || DurationParseError { input: s.to_string() };

        // Bare integers are seconds, as typed at the interactive prompt
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            let secs: u64 = input.parse().map_err(|_| err())?;
            return Self::from_secs(secs).ok_or_else(err);
        }

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| err())?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(err());
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(err());
        }

        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(err)?;

        Self::from_secs(total).ok_or_else(err)
    }
}

impl fmt::Display for RecordingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minutes = self.seconds / 60;
        let seconds = self.seconds % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for RecordingDuration {
    fn default() -> Self {
        Self::default_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_seconds() {
        let d: RecordingDuration = "45".parse().unwrap();
        assert_eq!(d.as_secs(), 45);
    }

    #[test]
    fn parse_seconds_suffix() {
        let d: RecordingDuration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: RecordingDuration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        let d: RecordingDuration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_rejects_zero() {
        assert!("0".parse::<RecordingDuration>().is_err());
        assert!("0s".parse::<RecordingDuration>().is_err());
        assert!("0m0s".parse::<RecordingDuration>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<RecordingDuration>().is_err());
        assert!("-5".parse::<RecordingDuration>().is_err());
        assert!("abc".parse::<RecordingDuration>().is_err());
        assert!("30x".parse::<RecordingDuration>().is_err());
        assert!("1.5".parse::<RecordingDuration>().is_err());
    }

    #[test]
    fn from_secs_rejects_zero() {
        assert!(RecordingDuration::from_secs(0).is_none());
        assert_eq!(RecordingDuration::from_secs(2).unwrap().as_secs(), 2);
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(RecordingDuration::from_secs(30).unwrap().to_string(), "30s");
        assert_eq!(RecordingDuration::from_secs(120).unwrap().to_string(), "2m");
        assert_eq!(RecordingDuration::from_secs(150).unwrap().to_string(), "2m30s");
    }

    #[test]
    fn as_std_duration() {
        let d = RecordingDuration::from_secs(3).unwrap();
        assert_eq!(d.as_std(), StdDuration::from_secs(3));
    }
}
