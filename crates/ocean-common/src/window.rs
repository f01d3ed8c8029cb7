//! Temporal search window parameters.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{OceanError, OceanResult};

/// Default full width of the temporal search window, in seconds.
///
/// 856710 s is just under ten days, two full repeat sub-cycles of the
/// reference altimetry missions, so a window centered on an observation date
/// always spans at least one ascending and one descending pass.
pub const DEFAULT_TIME_WINDOW_SECS: i64 = 856_710;

/// Full-width temporal window centered on a query instant.
///
/// Store filters use the half width on each side of the center; the full
/// width is what callers configure, matching the window parameter of the
/// search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    full_secs: i64,
}

impl TimeWindow {
    /// Create a window from its full width. Must be positive.
    pub fn new(full: Duration) -> OceanResult<Self> {
        let full_secs = full.num_seconds();
        if full_secs <= 0 {
            return Err(OceanError::InvalidWindow(format!(
                "time window must be positive, got {} s",
                full_secs
            )));
        }
        Ok(Self { full_secs })
    }

    /// The full window width.
    pub fn full(&self) -> Duration {
        Duration::seconds(self.full_secs)
    }

    /// Half the window width; the store filter extends this far on each
    /// side of the center instant.
    pub fn half(&self) -> Duration {
        Duration::seconds(self.full_secs / 2)
    }

    /// Inclusive time bounds around a center instant.
    pub fn bounds(&self, center: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (center - self.half(), center + self.half())
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            full_secs: DEFAULT_TIME_WINDOW_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_window_half_width() {
        let w = TimeWindow::default();
        assert_eq!(w.full().num_seconds(), 856_710);
        assert_eq!(w.half().num_seconds(), 428_355);
    }

    #[test]
    fn test_bounds_centered() {
        let w = TimeWindow::new(Duration::seconds(7200)).unwrap();
        let center = Utc.with_ymd_and_hms(2013, 3, 14, 5, 0, 0).unwrap();
        let (lo, hi) = w.bounds(center);
        assert_eq!(hi - lo, Duration::seconds(7200));
        assert_eq!(center - lo, Duration::seconds(3600));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(TimeWindow::new(Duration::seconds(0)).is_err());
        assert!(TimeWindow::new(Duration::seconds(-60)).is_err());
    }
}
