//! Line and run descriptions as they appear in the input.
//!
//! These types map directly to the JSON timetable. They are turned into
//! concrete runs by [`super::resolve_line`].

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::domain::{StyleOptions, TimeValue};

/// One `[station, arrival, departure]` entry of a stop list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StopEntry(pub String, pub TimeValue, pub TimeValue);

impl StopEntry {
    pub fn station(&self) -> &str {
        &self.0
    }
}

/// One `[station, track]` entry of a track list.
///
/// Tracks may be written as numbers (`["KA", 3]`); they are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackEntry(pub String, #[serde(deserialize_with = "track_label")] pub String);

fn track_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(text) => text,
        Label::Number(number) => number.to_string(),
    })
}

/// A line: a shared stop pattern plus the runs scheduled on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Line {
    #[serde(rename = "optionen")]
    pub options: LineOptions,
    #[serde(rename = "fahrten", default)]
    pub runs: Vec<RunDescriptor>,
}

/// Defaults shared by every run of a line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    pub name: String,
    /// Canonical stop pattern, offsets relative to an arbitrary zero.
    #[serde(rename = "zeiten")]
    pub stops: Vec<StopEntry>,
    /// Default track per station.
    #[serde(rename = "gleis")]
    pub tracks: Vec<TrackEntry>,
    /// Colour, drawn as a bare style flag.
    #[serde(rename = "farbe")]
    pub color: Option<String>,
    #[serde(rename = "stil")]
    pub style: StyleOptions,
}

/// Per-run changes to the line defaults.
///
/// Every field is optional; an absent field keeps the line default, while a
/// present but empty list still counts as given.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunOverrides {
    /// Replacement times for a subset of stops, matched by station code.
    #[serde(rename = "zeiten")]
    pub stops: Option<Vec<StopEntry>>,
    /// Replacement tracks for a subset of stops, matched by station code.
    #[serde(rename = "gleis")]
    pub tracks: Option<Vec<TrackEntry>>,
    /// Options merged over the line style.
    #[serde(rename = "stil")]
    pub style: Option<StyleOptions>,
    pub name: Option<String>,
    #[serde(rename = "farbe")]
    pub color: Option<String>,
}

/// One scheduled run of a line.
///
/// In the input a run is a number of minutes (`420`), clock text (`"7:00"`),
/// or an `[anchor, overrides]` pair (`["7:00", {"name": "RE 2"}]`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum RunDescriptor {
    Anchor(f64),
    AnchorText(String),
    AnchorWithOverrides(TimeValue, RunOverrides),
}

impl TryFrom<Value> for RunDescriptor {
    type Error = serde_json::Error;

    // Dispatch on the JSON shape by hand so errors inside the overrides
    // (a bad style option, say) reach the user intact.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(RunDescriptor::Anchor)
                .ok_or_else(|| de::Error::custom(format!("run anchor {number} is out of range"))),
            Value::String(text) => Ok(RunDescriptor::AnchorText(text)),
            Value::Array(items) => {
                let mut items = items.into_iter();
                match (items.next(), items.next(), items.next()) {
                    (Some(anchor), overrides, None) => {
                        let anchor = serde_json::from_value(anchor)?;
                        let overrides = match overrides {
                            Some(overrides) => serde_json::from_value(overrides)?,
                            None => RunOverrides::default(),
                        };
                        Ok(RunDescriptor::AnchorWithOverrides(anchor, overrides))
                    }
                    _ => Err(de::Error::custom(
                        "expected a run as [anchor] or [anchor, overrides]",
                    )),
                }
            }
            other => Err(de::Error::custom(format!(
                "expected a run as a number, clock text or [anchor, overrides], got {other}"
            ))),
        }
    }
}

impl RunDescriptor {
    /// The minute the run's first departure is moved to.
    pub fn anchor(&self) -> Result<f64, crate::domain::TimeFormatError> {
        match self {
            RunDescriptor::Anchor(minutes) => Ok(*minutes),
            RunDescriptor::AnchorText(text) => crate::domain::parse_minutes(text),
            RunDescriptor::AnchorWithOverrides(anchor, _) => anchor.to_minutes(),
        }
    }

    pub fn overrides(&self) -> Option<&RunOverrides> {
        match self {
            RunDescriptor::AnchorWithOverrides(_, overrides) => Some(overrides),
            _ => None,
        }
    }
}
