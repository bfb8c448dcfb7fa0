//! Clock time handling for timetable input.
//!
//! Timetables carry times as fractional minutes since midnight. Input may
//! give them as a bare number of minutes or as `H:M` / `H:M:S` text, and
//! diagram labels render them back as `H:MM` or `H:MM:SS`.

use serde::Deserialize;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeFormatError {
    input: String,
    reason: &'static str,
}

impl TimeFormatError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A time as written in the input: either minutes or clock text.
///
/// # Examples
///
/// ```
/// use bildfahrplan::domain::TimeValue;
///
/// let value: TimeValue = serde_json::from_str("\"7:30\"").unwrap();
/// assert_eq!(value.to_minutes().unwrap(), 450.0);
///
/// let value: TimeValue = serde_json::from_str("12.5").unwrap();
/// assert_eq!(value.to_minutes().unwrap(), 12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Minutes(f64),
    Clock(String),
}

impl TimeValue {
    /// Resolve to minutes, parsing clock text if necessary.
    pub fn to_minutes(&self) -> Result<f64, TimeFormatError> {
        match self {
            TimeValue::Minutes(m) => Ok(*m),
            TimeValue::Clock(text) => parse_minutes(text),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(minutes: f64) -> Self {
        TimeValue::Minutes(minutes)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Clock(text.to_string())
    }
}

/// Parse clock text into minutes since midnight.
///
/// Accepts `H:M:S`, `H:M` or a bare number of minutes. Seconds become a
/// fractional minute.
///
/// # Examples
///
/// ```
/// use bildfahrplan::domain::parse_minutes;
///
/// assert_eq!(parse_minutes("7:05").unwrap(), 425.0);
/// assert_eq!(parse_minutes("7:05:30").unwrap(), 425.5);
/// assert_eq!(parse_minutes("90").unwrap(), 90.0);
///
/// assert!(parse_minutes("7:xx").is_err());
/// assert!(parse_minutes("1:2:3:4").is_err());
/// ```
pub fn parse_minutes(text: &str) -> Result<f64, TimeFormatError> {
    let field = |segment: &str, reason: &'static str| {
        segment
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TimeFormatError::new(text, reason))
    };

    let segments: Vec<&str> = text.split(':').collect();
    match *segments.as_slice() {
        [hours, minutes, seconds] => Ok(60.0 * field(hours, "invalid hours")?
            + field(minutes, "invalid minutes")?
            + field(seconds, "invalid seconds")? / 60.0),
        [hours, minutes] => {
            Ok(60.0 * field(hours, "invalid hours")? + field(minutes, "invalid minutes")?)
        }
        [minutes] => field(minutes, "not a number of minutes"),
        _ => Err(TimeFormatError::new(
            text,
            "expected H:M:S, H:M or a number of minutes",
        )),
    }
}

/// Products of `minutes * 60` this close to a whole second count as that
/// second, so `7:05:20` does not label as `7:05:19`.
const SECOND_SNAP: f64 = 1e-6;

/// Format minutes since midnight as clock text.
///
/// Hours, minutes and seconds are floored, not rounded, so only whole
/// minutes survive a round trip through [`parse_minutes`]. Hours are not
/// padded and may exceed 23.
///
/// # Examples
///
/// ```
/// use bildfahrplan::domain::format_minutes;
///
/// assert_eq!(format_minutes(425.0, false), "7:05");
/// assert_eq!(format_minutes(425.5, true), "7:05:30");
/// assert_eq!(format_minutes(425.99, false), "7:05");
/// assert_eq!(format_minutes(1500.0, false), "25:00");
/// ```
pub fn format_minutes(minutes: f64, with_seconds: bool) -> String {
    let mut total_seconds = minutes * 60.0;
    let nearest = total_seconds.round();
    if (total_seconds - nearest).abs() < SECOND_SNAP {
        total_seconds = nearest;
    }

    let hours = (total_seconds / 3600.0).floor() as i64;
    let mins = (total_seconds / 60.0).floor().rem_euclid(60.0) as u32;
    let secs = total_seconds.floor().rem_euclid(60.0) as u32;

    if with_seconds {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{hours}:{mins:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hours_minutes() {
        assert_eq!(parse_minutes("0:00").unwrap(), 0.0);
        assert_eq!(parse_minutes("7:20").unwrap(), 440.0);
        assert_eq!(parse_minutes("23:59").unwrap(), 1439.0);
        assert_eq!(parse_minutes("25:10").unwrap(), 1510.0);
    }

    #[test]
    fn parse_unpadded_segments() {
        assert_eq!(parse_minutes("7:5").unwrap(), 425.0);
        assert_eq!(parse_minutes("7:5:30").unwrap(), 425.5);
    }

    #[test]
    fn parse_seconds_as_fraction() {
        assert_eq!(parse_minutes("1:00:30").unwrap(), 60.5);
        assert_eq!(parse_minutes("0:00:45").unwrap(), 0.75);
    }

    #[test]
    fn parse_bare_number() {
        assert_eq!(parse_minutes("15").unwrap(), 15.0);
        assert_eq!(parse_minutes("2.5").unwrap(), 2.5);
        assert_eq!(parse_minutes("-3").unwrap(), -3.0);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!(parse_minutes("").is_err());
        assert!(parse_minutes("abc").is_err());
        assert!(parse_minutes("7:").is_err());
        assert!(parse_minutes(":30").is_err());
        assert!(parse_minutes("7:3x").is_err());
        assert!(parse_minutes("7:30:zz").is_err());
        assert!(parse_minutes("inf").is_err());
        assert!(parse_minutes("NaN").is_err());
        assert!(parse_minutes("1:2:3:4").is_err());
    }

    #[test]
    fn error_display() {
        let err = parse_minutes("7:xx").unwrap_err();
        assert_eq!(err.to_string(), "invalid time \"7:xx\": invalid minutes");
        assert_eq!(err.input(), "7:xx");
    }

    #[test]
    fn format_pads_minutes_not_hours() {
        assert_eq!(format_minutes(0.0, false), "0:00");
        assert_eq!(format_minutes(65.0, false), "1:05");
        assert_eq!(format_minutes(600.0, false), "10:00");
    }

    #[test]
    fn format_floors() {
        assert_eq!(format_minutes(65.9, false), "1:05");
        assert_eq!(format_minutes(65.9, true), "1:05:54");
    }

    #[test]
    fn format_with_seconds() {
        assert_eq!(format_minutes(60.5, true), "1:00:30");
        assert_eq!(format_minutes(60.0, true), "1:00:00");
        assert_eq!(format_minutes(parse_minutes("7:05:20").unwrap(), true), "7:05:20");
    }

    #[test]
    fn format_negative_borrows_from_hours() {
        assert_eq!(format_minutes(-30.0, false), "-1:30");
    }

    #[test]
    fn hh_mm_round_trip() {
        for text in ["0:00", "7:05", "12:30", "23:59", "26:01"] {
            assert_eq!(format_minutes(parse_minutes(text).unwrap(), false), text);
        }
    }

    #[test]
    fn fractional_seconds_do_not_round_trip() {
        let text = "7:05:30.5";
        let formatted = format_minutes(parse_minutes(text).unwrap(), true);
        assert_eq!(formatted, "7:05:30");
        assert_ne!(formatted, text);
    }

    #[test]
    fn time_value_deserialize() {
        let v: TimeValue = serde_json::from_str("420").unwrap();
        assert_eq!(v, TimeValue::Minutes(420.0));
        let v: TimeValue = serde_json::from_str("\"7:00\"").unwrap();
        assert_eq!(v, TimeValue::Clock("7:00".into()));
        assert_eq!(v.to_minutes().unwrap(), 420.0);
    }

    #[test]
    fn time_value_bad_clock() {
        let v = TimeValue::from("seven");
        assert!(v.to_minutes().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_hhmm()(hour in 0u32..48, minute in 0u32..60) -> String {
            format!("{hour}:{minute:02}")
        }
    }

    proptest! {
        /// Zero-padded H:MM text survives parse then format
        #[test]
        fn hhmm_roundtrip(text in valid_hhmm()) {
            let minutes = parse_minutes(&text).unwrap();
            prop_assert_eq!(format_minutes(minutes, false), text);
        }

        /// Whole seconds survive parse then format with seconds
        #[test]
        fn whole_seconds_roundtrip(hour in 0u32..30, minute in 0u32..60, second in 0u32..60) {
            let text = format!("{hour}:{minute:02}:{second:02}");
            let minutes = parse_minutes(&text).unwrap();
            prop_assert_eq!(format_minutes(minutes, true), text);
        }

        /// Integer minutes round-trip exactly through text
        #[test]
        fn integer_minutes_roundtrip(minutes in 0i64..5000) {
            let value = minutes as f64;
            let text = format_minutes(value, false);
            prop_assert_eq!(parse_minutes(&text).unwrap(), value);
        }

        /// Formatting never moves a time forwards
        #[test]
        fn format_floors_never_exceeds(minutes in 0.0f64..3000.0) {
            let back = parse_minutes(&format_minutes(minutes, false)).unwrap();
            prop_assert!(back <= minutes + 1e-6);
            prop_assert!(minutes - back < 1.0);
        }
    }
}
