//! Pure decision rules

mod bike_carriage;
mod holidays;

pub use bike_carriage::TimeWindowPolicy;
pub use holidays::{HolidayCalendar, HolidayCalendarKind, easter_sunday};
