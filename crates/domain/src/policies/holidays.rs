//! Public-holiday calendars

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Built-in calendar selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayCalendarKind {
    /// French public holidays (metropolitan)
    #[default]
    France,
    /// No built-in holidays
    None,
}

/// Recognised public holidays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HolidayCalendar {
    pub kind: HolidayCalendarKind,
    /// Additional dates treated as holidays
    #[serde(default)]
    pub extra_dates: Vec<NaiveDate>,
}

impl HolidayCalendar {
    #[must_use]
    pub const fn france() -> Self {
        Self {
            kind: HolidayCalendarKind::France,
            extra_dates: Vec::new(),
        }
    }

    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: HolidayCalendarKind::None,
            extra_dates: Vec::new(),
        }
    }

    /// Add configured dates on top of the built-in calendar
    #[must_use]
    pub fn with_extra_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.extra_dates.extend(dates);
        self
    }

    /// Whether `date` is a holiday under this calendar
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.extra_dates.contains(&date) {
            return true;
        }
        match self.kind {
            HolidayCalendarKind::France => is_french_holiday(date),
            HolidayCalendarKind::None => false,
        }
    }
}

fn is_french_holiday(date: NaiveDate) -> bool {
    let fixed = matches!(
        (date.month(), date.day()),
        (1, 1) | (5, 1) | (5, 8) | (7, 14) | (8, 15) | (11, 1) | (11, 11) | (12, 25)
    );
    if fixed {
        return true;
    }
    let Some(easter) = easter_sunday(date.year()) else {
        return false;
    };
    // Easter Monday, Ascension Thursday, Whit Monday
    [1, 39, 50]
        .into_iter()
        .any(|offset| easter + Duration::days(offset) == date)
}

/// Gregorian Easter Sunday (anonymous computus)
#[must_use]
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = u32::try_from((h + l - 7 * m + 114) / 31).ok()?;
    let day = u32::try_from((h + l - 7 * m + 114) % 31 + 1).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
