//! Drawing option bags.
//!
//! A `StyleOptions` is an ordered list of drawing options as they appear in
//! the input, e.g. `{"red": true, "line width": "1pt"}`. Order is kept so
//! that identical input always serializes to identical markup.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Error returned when a style object contains an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid style option {key:?}: {reason}")]
pub struct StyleError {
    key: String,
    reason: &'static str,
}

/// Value of a single drawing option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare flag, serialized as just the key (`red`).
    Flag,
    /// Explicitly switched off; the key is kept for ordering but not emitted.
    Off,
    /// Key-value pair, serialized as `key=value`.
    Value(String),
}

/// Ordered set of drawing options.
///
/// # Examples
///
/// ```
/// use bildfahrplan::domain::StyleOptions;
///
/// let base = StyleOptions::new().flag("gray").value("line width", "1pt");
/// let over = StyleOptions::new().value("line width", "2pt").flag("dashed");
/// let merged = base.merged(&over);
///
/// let keys: Vec<_> = merged.iter().map(|(k, _)| k).collect();
/// assert_eq!(keys, ["gray", "line width", "dashed"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct StyleOptions {
    entries: Vec<(String, OptionValue)>,
}

impl StyleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleOptions::set`] with a bare flag.
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.set(key, OptionValue::Flag);
        self
    }

    /// Builder form of [`StyleOptions::set`] with a key-value pair.
    pub fn value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, OptionValue::Value(value.into()));
        self
    }

    /// Set an option. An existing key keeps its position and takes the new value.
    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Merge `other` into `self`; `other` wins key by key.
    pub fn merge(&mut self, other: &StyleOptions) {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.clone());
        }
    }

    /// Returns a copy of `self` merged with `other`.
    pub fn merged(&self, other: &StyleOptions) -> StyleOptions {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Options in order, including ones switched off.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for StyleOptions {
    type Error = StyleError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut options = StyleOptions::new();
        for (key, value) in map {
            let value = match value {
                Value::Bool(true) => OptionValue::Flag,
                Value::Bool(false) => OptionValue::Off,
                Value::String(s) => OptionValue::Value(s),
                Value::Number(n) => OptionValue::Value(n.to_string()),
                Value::Null => {
                    return Err(StyleError {
                        key,
                        reason: "null is not a drawing option value",
                    });
                }
                Value::Array(_) | Value::Object(_) => {
                    return Err(StyleError {
                        key,
                        reason: "nested values are not supported",
                    });
                }
            };
            options.set(key, value);
        }
        Ok(options)
    }
}

/// Per-element label configuration.
///
/// In the input an element option is absent or `true` (use the default
/// look), `false` (do not draw the element at all) or an object of options
/// merged over the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ElementOption {
    #[default]
    Default,
    Suppressed,
    Override(StyleOptions),
}

impl TryFrom<Value> for ElementOption {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(true) => Ok(ElementOption::Default),
            Value::Bool(false) => Ok(ElementOption::Suppressed),
            // Go through the map directly so a bad option keeps its own message
            Value::Object(map) => StyleOptions::try_from(map)
                .map(ElementOption::Override)
                .map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected true, false or an object of drawing options, got {other}"
            ))),
        }
    }
}

impl ElementOption {
    /// Apply this option on top of `base`.
    ///
    /// Returns `None` when the element is suppressed.
    pub fn apply(&self, base: StyleOptions) -> Option<StyleOptions> {
        match self {
            ElementOption::Default => Some(base),
            ElementOption::Suppressed => None,
            ElementOption::Override(options) => Some(base.merged(options)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StyleOptions {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_keeps_document_order() {
        let options = parse(r#"{"thick": true, "red": true, "opacity": 0.5, "font": "\\tiny"}"#);
        let entries: Vec<_> = options.iter().collect();
        assert_eq!(
            entries,
            [
                ("thick", &OptionValue::Flag),
                ("red", &OptionValue::Flag),
                ("opacity", &OptionValue::Value("0.5".into())),
                ("font", &OptionValue::Value("\\tiny".into())),
            ]
        );
    }

    #[test]
    fn deserialize_false_is_off() {
        let options = parse(r#"{"gray": false}"#);
        assert_eq!(options.get("gray"), Some(&OptionValue::Off));
    }

    #[test]
    fn deserialize_rejects_nested() {
        let result: Result<StyleOptions, _> = serde_json::from_str(r#"{"a": {"b": 1}}"#);
        assert!(result.is_err());
        let result: Result<StyleOptions, _> = serde_json::from_str(r#"{"a": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn merge_override_wins_in_place() {
        let mut base = StyleOptions::new().flag("gray").value("opacity", "1");
        base.merge(&StyleOptions::new().value("opacity", "0.5").flag("thick"));

        let entries: Vec<_> = base.iter().collect();
        assert_eq!(
            entries,
            [
                ("gray", &OptionValue::Flag),
                ("opacity", &OptionValue::Value("0.5".into())),
                ("thick", &OptionValue::Flag),
            ]
        );
    }

    #[test]
    fn merge_can_switch_off() {
        let base = StyleOptions::new().flag("gray");
        let merged = base.merged(&parse(r#"{"gray": false}"#));
        assert_eq!(merged.get("gray"), Some(&OptionValue::Off));
        // The original is untouched
        assert_eq!(base.get("gray"), Some(&OptionValue::Flag));
    }

    #[test]
    fn element_option_states() {
        let parse_element = |json: &str| -> ElementOption { serde_json::from_str(json).unwrap() };

        assert_eq!(parse_element("true"), ElementOption::Default);
        assert_eq!(parse_element("false"), ElementOption::Suppressed);
        assert_eq!(
            parse_element(r#"{"blue": true}"#),
            ElementOption::Override(StyleOptions::new().flag("blue"))
        );
    }

    #[test]
    fn element_option_keeps_style_error() {
        let err = serde_json::from_str::<ElementOption>(r#"{"x": [1]}"#).unwrap_err();
        assert!(
            err.to_string()
                .contains("invalid style option \"x\": nested values are not supported")
        );

        let err = serde_json::from_str::<ElementOption>("3").unwrap_err();
        assert!(err.to_string().contains("true, false or an object of drawing options"));
    }

    #[test]
    fn element_option_apply() {
        let base = StyleOptions::new().flag("left");

        assert_eq!(ElementOption::Default.apply(base.clone()), Some(base.clone()));
        assert_eq!(ElementOption::Suppressed.apply(base.clone()), None);

        let over = ElementOption::Override(StyleOptions::new().flag("blue"));
        assert_eq!(
            over.apply(base),
            Some(StyleOptions::new().flag("left").flag("blue"))
        );
    }

    #[test]
    fn error_display() {
        let err: StyleError = StyleOptions::try_from(
            serde_json::from_str::<Map<String, Value>>(r#"{"x": [1]}"#).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid style option \"x\": nested values are not supported"
        );
    }
}
