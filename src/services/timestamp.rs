//! Wall-clock rendering for the date endpoint.
//!
//! Layout is the legacy RFC 850 one (`Monday, 02-Jan-06 15:04:05 MST`):
//! full weekday, two-digit day, abbreviated month, two-digit year, 24h time,
//! zone name. Times are rendered in UTC so the zone is always `UTC`.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

pub const RFC850_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S %Z";

pub fn format_rfc850<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(RFC850_FORMAT).to_string()
}

pub fn now_rfc850() -> String {
    format_rfc850(&Utc::now())
}
