//! Time tag bindings (RFC 8949 §3.4.1/§3.4.2, CBOR tags 0 and 1).
//!
//! A minimal, dependency-free epoch-seconds wrapper plus an RFC 3339
//! parser/formatter for tag 0. Callers needing calendar types convert to/from
//! their own date-time crate at the boundary; this module only carries the
//! wire-level representations the tag registry (`crate::tag`) binds against.

use alloc::string::String;

use crate::codec::{CborArrayElem, CborDecode, CborEncode};
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::CborError;

/// Seconds since the Unix epoch, as an `f64` to allow sub-second precision
/// per RFC 8949 §3.4.2. Decodes from either tag 1 (numeric epoch seconds),
/// tag 0 (RFC 3339 text), or — depending on `DecodeMode::time_tag` — a bare
/// untagged number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochTime(pub f64);

impl EpochTime {
    #[must_use]
    pub const fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    #[must_use]
    pub const fn as_seconds(self) -> f64 {
        self.0
    }
}

impl CborEncode for EpochTime {
    fn encode(&self, enc: &mut Encoder) -> Result<(), CborError> {
        enc.epoch_time(self)
    }
}

impl<'de> CborDecode<'de> for EpochTime {
    fn decode(dec: &mut Decoder<'de>) -> Result<Self, CborError> {
        dec.read_epoch_time()
    }
}

impl CborArrayElem for EpochTime {}

const DAYS_PER_ERA: i64 = 146_097;
const DAYS_FROM_0000_TO_1970: i64 = 719_468;

/// Civil-calendar day count since the Unix epoch, per Howard Hinnant's
/// `days_from_civil` algorithm (proleptic Gregorian, valid for all `i64` years).
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (i64::from(m) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(d) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * DAYS_PER_ERA + doe - DAYS_FROM_0000_TO_1970
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + DAYS_FROM_0000_TO_1970;
    let era = if z >= 0 { z } else { z - 146_096 } / DAYS_PER_ERA;
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    #[allow(clippy::cast_sign_loss)]
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    #[allow(clippy::cast_sign_loss)]
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Parse an RFC 3339 timestamp into seconds since the Unix epoch. Accepts a
/// `Z`/`z` UTC designator or a numeric `+HH:MM`/`-HH:MM` offset, and an
/// optional fractional-seconds component.
#[must_use]
pub fn parse_rfc3339(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 20 {
        return None;
    }
    let year: i64 = s.get(0..4)?.parse().ok()?;
    if bytes[4] != b'-' {
        return None;
    }
    let month: u32 = s.get(5..7)?.parse().ok()?;
    if bytes[7] != b'-' {
        return None;
    }
    let day: u32 = s.get(8..10)?.parse().ok()?;
    if bytes[10] != b'T' && bytes[10] != b't' {
        return None;
    }
    let hour: i64 = s.get(11..13)?.parse().ok()?;
    if bytes[13] != b':' {
        return None;
    }
    let minute: i64 = s.get(14..16)?.parse().ok()?;
    if bytes[16] != b':' {
        return None;
    }
    let second: i64 = s.get(17..19)?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut idx = 19;
    let mut frac = 0.0f64;
    if bytes.get(idx) == Some(&b'.') {
        let start = idx + 1;
        let mut end = start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end == start {
            return None;
        }
        let frac_str = s.get(start..end)?;
        let frac_digits: f64 = frac_str.parse().ok()?;
        frac = frac_digits / 10f64.powi(i32::try_from(frac_str.len()).ok()?);
        idx = end;
    }

    let offset_seconds: i64 = match bytes.get(idx) {
        Some(b'Z' | b'z') => {
            idx += 1;
            0
        }
        Some(&sign_byte) if sign_byte == b'+' || sign_byte == b'-' => {
            let sign = if sign_byte == b'+' { 1 } else { -1 };
            let oh: i64 = s.get(idx + 1..idx + 3)?.parse().ok()?;
            if bytes.get(idx + 3) != Some(&b':') {
                return None;
            }
            let om: i64 = s.get(idx + 4..idx + 6)?.parse().ok()?;
            idx += 6;
            sign * (oh * 3600 + om * 60)
        }
        _ => return None,
    };
    if idx != bytes.len() {
        return None;
    }

    let days = days_from_civil(year, month, day);
    let seconds_of_day = hour * 3600 + minute * 60 + second;
    let total = days * 86400 + seconds_of_day - offset_seconds;
    Some(total as f64 + frac)
}

/// Format seconds since the Unix epoch as an RFC 3339 UTC timestamp,
/// emitting a `.NNN` fractional component only when `seconds` has one.
#[must_use]
pub fn format_rfc3339(seconds: f64) -> String {
    let whole = seconds.floor();
    let frac = seconds - whole;
    #[allow(clippy::cast_possible_truncation)]
    let total = whole as i64;
    let days = total.div_euclid(86400);
    let mut sod = total.rem_euclid(86400);
    let (y, m, d) = civil_from_days(days);
    let hour = sod / 3600;
    sod %= 3600;
    let minute = sod / 60;
    let second = sod % 60;
    if frac.abs() > 1e-9 {
        #[allow(clippy::cast_possible_truncation)]
        let millis = (frac * 1000.0).round() as i64;
        alloc::format!("{y:04}-{m:02}-{d:02}T{hour:02}:{minute:02}:{second:02}.{millis:03}Z")
    } else {
        alloc::format!("{y:04}-{m:02}-{d:02}T{hour:02}:{minute:02}:{second:02}Z")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_7_timestamp() {
        let seconds = parse_rfc3339("2013-03-21T20:04:00Z").unwrap();
        assert_eq!(format_rfc3339(seconds), "2013-03-21T20:04:00Z");
    }

    #[test]
    fn round_trips_unix_epoch() {
        assert_eq!(format_rfc3339(0.0), "1970-01-01T00:00:00Z");
        assert_eq!(parse_rfc3339("1970-01-01T00:00:00Z"), Some(0.0));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_rfc3339("not a time"), None);
        assert_eq!(parse_rfc3339("2013-13-21T20:04:00Z"), None);
    }

    #[test]
    fn honors_numeric_offset() {
        // 20:04:00+01:00 is 19:04:00Z.
        let with_offset = parse_rfc3339("2013-03-21T20:04:00+01:00").unwrap();
        let utc = parse_rfc3339("2013-03-21T19:04:00Z").unwrap();
        assert_eq!(with_offset, utc);
    }
}
