//! Bike-carriage policy configuration

use chrono::NaiveDate;
use chrono_tz::Tz;
use domain::{HolidayCalendar, HolidayCalendarKind, TimeWindowPolicy};
use serde::{Deserialize, Serialize};

/// Timezone and holiday calendar used by the carriage policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// IANA timezone of the network's wall clock
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Built-in holiday calendar (`france` or `none`)
    #[serde(default)]
    pub calendar: HolidayCalendarKind,

    /// Additional dates on which bikes are always allowed
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            calendar: HolidayCalendarKind::default(),
            extra_holidays: Vec::new(),
        }
    }
}

impl PolicyConfig {
    /// Build the policy
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone is not a known IANA name.
    pub fn to_policy(&self) -> Result<TimeWindowPolicy, String> {
        let timezone: Tz = self
            .timezone
            .trim()
            .parse()
            .map_err(|e| format!("policy: unknown timezone '{}': {e}", self.timezone))?;

        let calendar = match self.calendar {
            HolidayCalendarKind::France => HolidayCalendar::france(),
            HolidayCalendarKind::None => HolidayCalendar::none(),
        }
        .with_extra_dates(self.extra_holidays.iter().copied());

        Ok(TimeWindowPolicy::new(timezone, calendar))
    }
}
