//! When a bicycle may board a train

use chrono::{Datelike, NaiveDateTime, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use super::holidays::HolidayCalendar;

const MORNING_RUSH_START: u32 = 6 * 3600 + 30 * 60;
const MORNING_RUSH_END: u32 = 9 * 3600 + 30 * 60;
const EVENING_RUSH_START: u32 = 16 * 3600 + 30 * 60;
const EVENING_RUSH_END: u32 = 19 * 3600;

/// Weekday rush-hour restriction on carrying bikes
///
/// Weekends and holidays are unrestricted. On other days a bike is refused
/// from 06:30 until 09:30 (exclusive) and after 16:30 until 19:00 (exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindowPolicy {
    timezone: Tz,
    calendar: HolidayCalendar,
}

impl TimeWindowPolicy {
    #[must_use]
    pub const fn new(timezone: Tz, calendar: HolidayCalendar) -> Self {
        Self { timezone, calendar }
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub const fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Whether a bike may board at `instant`, or now when `None`
    #[must_use]
    pub fn is_bike_carriage_permitted(&self, instant: Option<NaiveDateTime>) -> bool {
        let instant =
            instant.unwrap_or_else(|| Utc::now().with_timezone(&self.timezone).naive_local());
        self.permits(instant)
    }

    /// Whether a bike may board at a local wall-clock instant
    #[must_use]
    pub fn permits(&self, instant: NaiveDateTime) -> bool {
        let date = instant.date();
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.calendar.is_holiday(date) {
            return true;
        }
        let seconds = instant.time().num_seconds_from_midnight();
        !((MORNING_RUSH_START..MORNING_RUSH_END).contains(&seconds)
            || (EVENING_RUSH_START + 1..EVENING_RUSH_END).contains(&seconds))
    }
}

impl Default for TimeWindowPolicy {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Paris, HolidayCalendar::france())
    }
}
