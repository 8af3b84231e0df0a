//! UTC timestamps for `dcterms:modified` and zip entry dates.

use std::fmt::Display;

const SECS_PER_DAY: i64 = 86_400;
/// Days from 0000-03-01 to 1970-01-01 in the proleptic Gregorian calendar.
const EPOCH_SHIFT: i64 = 719_468;
const DAYS_PER_ERA: i64 = 146_097;

/// A UTC timestamp with second precision, between the years `0` and `9999`.
///
/// Displayed in the form EPUB 3 requires for `dcterms:modified`:
/// `YYYY-MM-DDThh:mm:ssZ`.
///
/// # Examples
/// ```
/// use quire::datetime::DateTime;
///
/// let modified = DateTime::new(2023, 1, 25, 10, 11, 35).unwrap();
///
/// assert_eq!("2023-01-25T10:11:35Z", modified.to_string());
/// assert_eq!(modified, DateTime::from_unix(1674641495));
///
/// // February 30th does not exist
/// assert_eq!(None, DateTime::new(2023, 2, 30, 0, 0, 0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    /// `1980-01-01T00:00:00Z`, the earliest timestamp a zip entry can hold.
    ///
    /// Used for `dcterms:modified` and entry dates when a book pins
    /// no timestamp, so that output does not depend on the clock.
    pub const ZIP_EPOCH: DateTime = DateTime::saturated(1980, 1, 1, 0, 0, 0);

    /// Creates a timestamp from calendar parts.
    ///
    /// Returns [`None`] if any part is out of range,
    /// including days past the end of the given month.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        let valid = year <= 9999
            && (1..=12).contains(&month)
            && (1..=days_in_month(year, month)).contains(&day)
            && hour < 24
            && minute < 60
            && second < 60;

        valid.then_some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Attempts to return the current UTC time.
    ///
    /// Returns `None` on targets where [`std::time::SystemTime`] is unsupported,
    /// such as `wasm32-unknown-unknown`.
    pub fn try_now() -> Option<Self> {
        #[cfg(all(target_family = "wasm", target_os = "unknown"))]
        {
            None
        }
        #[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
        {
            let secs = match std::time::UNIX_EPOCH.elapsed() {
                Ok(elapsed) => elapsed.as_secs() as i64,
                // Clock set before 1970-01-01T00:00:00Z
                Err(error) => -(error.duration().as_secs() as i64),
            };
            Some(Self::from_unix(secs))
        }
    }

    /// Converts seconds since the UNIX epoch.
    ///
    /// Timestamps outside the years `0` to `9999` saturate to the nearest bound.
    ///
    /// # Examples
    /// ```
    /// # use quire::datetime::DateTime;
    /// let datetime = DateTime::from_unix(-58016463);
    ///
    /// assert_eq!("1968-02-29T12:18:57Z", datetime.to_string());
    /// assert_eq!((1968, 2, 29), (datetime.year(), datetime.month(), datetime.day()));
    /// ```
    pub fn from_unix(secs: i64) -> Self {
        const MIN: DateTime = DateTime::saturated(0, 1, 1, 0, 0, 0);
        const MAX: DateTime = DateTime::saturated(9999, 12, 31, 23, 59, 59);

        let days = secs.div_euclid(SECS_PER_DAY);
        let secs_of_day = secs.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        match u16::try_from(year) {
            Ok(year) if year <= 9999 => Self {
                year,
                month,
                day,
                hour: (secs_of_day / 3600) as u8,
                minute: (secs_of_day / 60 % 60) as u8,
                second: (secs_of_day % 60) as u8,
            },
            _ if year < 0 => MIN,
            _ => MAX,
        }
    }

    const fn saturated(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// The year (`0-9999`).
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The month (`1-12`).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The day of the month (`1-31`).
    pub fn day(&self) -> u8 {
        self.day
    }

    /// The hour (`0-23`).
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The minute (`0-59`).
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The second (`0-59`).
    pub fn second(&self) -> u8 {
        self.second
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 to a proleptic Gregorian `(year, month, day)`.
///
/// See Howard Hinnant's `civil_from_days`:
/// <https://howardhinnant.github.io/date_algorithms.html>
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let shifted = days + EPOCH_SHIFT;
    let era = shifted.div_euclid(DAYS_PER_ERA);
    let day_of_era = shifted.rem_euclid(DAYS_PER_ERA);
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    // Months counted from March, so the leap day is last
    let march_month = (5 * day_of_year + 2) / 153;

    let day = (day_of_year - (153 * march_month + 2) / 5 + 1) as u8;
    let month = (if march_month < 10 { march_month + 3 } else { march_month - 9 }) as u8;
    let year = year_of_era + era * 400 + i64::from(month <= 2);

    (year, month, day)
}
