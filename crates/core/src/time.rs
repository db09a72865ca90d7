use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

fn unit(value: i64, name: &str) -> String {
    if value == 1 {
        format!("{value} {name}")
    } else {
        format!("{value} {name}s")
    }
}

/// Renders a study duration as "2 hours, 1 minute, 5 seconds".
///
/// Zero hours or minutes are left out; seconds are shown when nothing else is.
/// Negative durations render as "0 seconds".
#[must_use]
pub fn format_study_time(total: Duration) -> String {
    let secs = total.num_seconds().max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(unit(minutes, "minute"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(unit(seconds, "second"));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), fixed_now() + Duration::seconds(30));
    }

    #[test]
    fn default_clock_ignores_advance() {
        let mut clock = Clock::default_clock();
        clock.advance(Duration::days(1));
        assert!(!clock.is_fixed());
    }

    #[test]
    fn zero_and_sub_second_durations() {
        assert_eq!(format_study_time(Duration::zero()), "0 seconds");
        assert_eq!(format_study_time(Duration::milliseconds(400)), "0 seconds");
        assert_eq!(format_study_time(Duration::seconds(-5)), "0 seconds");
    }

    #[test]
    fn singular_and_plural_units() {
        assert_eq!(format_study_time(Duration::seconds(1)), "1 second");
        assert_eq!(format_study_time(Duration::seconds(61)), "1 minute, 1 second");
        assert_eq!(
            format_study_time(Duration::seconds(2 * 3600 + 5)),
            "2 hours, 5 seconds"
        );
        assert_eq!(format_study_time(Duration::seconds(3600 + 120)), "1 hour, 2 minutes");
    }
}
