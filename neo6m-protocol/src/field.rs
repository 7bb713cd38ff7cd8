use crate::record::{Coordinate, Date, Hemisphere, Time};

/// Width of an `hhmmss` / `ddmmyy` field.
const CLOCK_FIELD_LEN: usize = 6;

/// Decode a numeric field (course, speed) as floating point.
///
/// Reads the longest prefix of the form `[+-]digits[.digits]` and stops at
/// the first character that does not fit. `"3.065"` decodes to `3.065`,
/// `"12.5*7F"` to `12.5`. An empty field, or one with no leading digits,
/// decodes to `0.0`.
pub fn decode_number(field: &str) -> f32 {
    let bytes = field.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = leading_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[end + 1..]);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    field[..end].parse().unwrap_or_default()
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Decode an `hhmmss[.ss]` field. Fractional seconds are ignored.
///
/// Fewer than six characters, or a non-digit among the first six, yields
/// [`Time::INVALID`].
pub fn decode_time(field: &str) -> Time {
    match clock_pairs(field) {
        Some([hour, minute, second]) => Time {
            hour,
            minute,
            second,
        },
        None => Time::INVALID,
    }
}

/// Decode a `ddmmyy` field.
///
/// Fewer than six characters, or a non-digit among the first six, yields
/// [`Date::INVALID`].
pub fn decode_date(field: &str) -> Date {
    match clock_pairs(field) {
        Some([day, month, year]) => Date { day, month, year },
        None => Date::INVALID,
    }
}

/// Split the first six characters into three two-digit values.
fn clock_pairs(field: &str) -> Option<[u8; 3]> {
    let window = field.as_bytes().get(..CLOCK_FIELD_LEN)?;
    if !window.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let pair = |i: usize| (window[i] - b'0') * 10 + (window[i + 1] - b'0');
    Some([pair(0), pair(2), pair(4)])
}

/// Decode a `ddmm.mmmmm` / `dddmm.mmmmm` field with its hemisphere field.
///
/// The hemisphere must be exactly one of `N`, `S`, `E`, `W`; it is checked
/// before the value is looked at. `N`/`S` take two degree digits, `E`/`W`
/// three. All remaining digits (the `.` is skipped) form the minutes
/// integer, which is divided by 60 with truncation.
///
/// Any malformation yields [`Coordinate::INVALID`].
pub fn decode_coordinate(value: &str, hemisphere: &str) -> Coordinate {
    let mut chars = hemisphere.chars();
    let pole = match (chars.next(), chars.next()) {
        (Some(c), None) => Hemisphere::from_char(c),
        _ => None,
    };

    pole.and_then(|pole| scan_coordinate(value, pole))
        .unwrap_or(Coordinate::INVALID)
}

fn scan_coordinate(value: &str, pole: Hemisphere) -> Option<Coordinate> {
    let degree_digits = pole.degree_digits();
    let mut degrees: u32 = 0;
    let mut minutes: u64 = 0;
    let mut seen = 0;

    for byte in value.bytes() {
        if byte == b'.' {
            continue;
        }
        if !byte.is_ascii_digit() {
            return None;
        }
        let digit = byte - b'0';
        if seen < degree_digits {
            degrees = degrees * 10 + u32::from(digit);
        } else {
            minutes = minutes.checked_mul(10)?.checked_add(u64::from(digit))?;
        }
        seen += 1;
    }

    Some(Coordinate {
        degrees: u8::try_from(degrees).ok()?,
        fraction: u32::try_from(minutes / 60).ok()?,
        hemisphere: pole.as_char(),
    })
}
