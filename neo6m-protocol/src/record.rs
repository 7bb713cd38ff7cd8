use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Value used in every sub-field of a time, date or coordinate that failed
/// to decode.
pub const INVALID: u8 = 255;
/// Hemisphere character of a coordinate that failed to decode.
pub const INVALID_POLE: char = 'I';

/// UTC time of day from an `hhmmss` field.
///
/// A field that failed to decode holds [`INVALID`] in all three sub-fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Time {
    /// Hour (0–23).
    pub hour: u8,
    /// Minute (0–59).
    pub minute: u8,
    /// Second (0–59).
    pub second: u8,
}

impl Time {
    /// The sentinel for a malformed time field.
    pub const INVALID: Time = Time {
        hour: INVALID,
        minute: INVALID,
        second: INVALID,
    };

    /// Returns `false` for the malformed-field sentinel.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Convert to a `chrono` time, `None` for the sentinel or out-of-range values.
    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), self.second.into())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("--:--:--");
        }
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// UTC date from a `ddmmyy` field.
///
/// A field that failed to decode holds [`INVALID`] in all three sub-fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Date {
    /// Day of month (1–31).
    pub day: u8,
    /// Month (1–12).
    pub month: u8,
    /// Year as an offset from 2000.
    pub year: u8,
}

impl Date {
    /// The sentinel for a malformed date field.
    pub const INVALID: Date = Date {
        day: INVALID,
        month: INVALID,
        year: INVALID,
    };

    /// Returns `false` for the malformed-field sentinel.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Convert to a `chrono` date, `None` for the sentinel or an impossible calendar day.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        if !self.is_valid() {
            return None;
        }
        NaiveDate::from_ymd_opt(2000 + i32::from(self.year), self.month.into(), self.day.into())
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("----------");
        }
        write!(f, "20{:02}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Hemisphere of a latitude or longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Decode from the single-character NMEA hemisphere indicator.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Self::North),
            'S' => Some(Self::South),
            'E' => Some(Self::East),
            'W' => Some(Self::West),
            _ => None,
        }
    }

    /// The NMEA indicator character.
    pub fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }

    /// Latitudes carry 2 degree digits, longitudes 3.
    pub fn degree_digits(self) -> usize {
        match self {
            Self::North | Self::South => 2,
            Self::East | Self::West => 3,
        }
    }
}

/// A latitude or longitude in the receiver's fixed-point form.
///
/// `fraction` is the minutes part with its decimal point removed, divided by
/// 60 with integer truncation. For the NEO-6M's five-decimal minutes
/// (`1048.17086` -> minutes `48.17086`) that is the fractional degree scaled
/// by 100000.
///
/// A zeroed coordinate has hemisphere `'\0'`; a malformed one is
/// `(255, 255, 'I')`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coordinate {
    /// Whole degrees.
    pub degrees: u8,
    /// Fixed-point fractional degrees.
    pub fraction: u32,
    /// `N`, `S`, `E` or `W`.
    pub hemisphere: char,
}

impl Coordinate {
    /// The sentinel for a malformed coordinate or hemisphere.
    pub const INVALID: Coordinate = Coordinate {
        degrees: INVALID,
        fraction: INVALID as u32,
        hemisphere: INVALID_POLE,
    };

    /// Returns `false` for the malformed-field sentinel.
    pub fn is_valid(&self) -> bool {
        self.hemisphere != INVALID_POLE
    }

    /// The decoded hemisphere, `None` for zeroed or malformed coordinates.
    pub fn hemisphere(&self) -> Option<Hemisphere> {
        Hemisphere::from_char(self.hemisphere)
    }

    /// Signed decimal degrees (South and West negative).
    ///
    /// Assumes five decimal places of minutes, as the NEO-6M emits.
    pub fn to_decimal_degrees(&self) -> Option<f64> {
        let hemisphere = self.hemisphere()?;
        let value = f64::from(self.degrees) + f64::from(self.fraction) / 100_000.0;
        Some(match hemisphere {
            Hemisphere::South | Hemisphere::West => -value,
            Hemisphere::North | Hemisphere::East => value,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hemisphere() {
            Some(h) => write!(f, "{}.{:05} {}", self.degrees, self.fraction, h.as_char()),
            None => write!(f, "-"),
        }
    }
}

/// Course and speed over ground (VTG).
///
/// Numeric fields are decoded as floating point: `"2.181"` becomes `2.181`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VtgInfo {
    /// Course over ground, degrees true.
    pub course: f32,
    /// Speed over ground in knots.
    pub speed_knots: f32,
    /// Speed over ground in km/h.
    pub speed_kph: f32,
}

/// Recommended minimum navigation data (RMC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RmcInfo {
    /// UTC time of the fix.
    pub time: Time,
    /// UTC date of the fix.
    pub date: Date,
    /// Latitude.
    pub latitude: Coordinate,
    /// Longitude.
    pub longitude: Coordinate,
}

impl RmcInfo {
    /// Combined UTC timestamp, `None` if either the date or the time is unusable.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        Some(self.date.to_naive_date()?.and_time(self.time.to_naive_time()?))
    }
}
