//! Station list entries.

use serde::Deserialize;

/// A station on the diagram's horizontal axis.
///
/// Stations have no explicit order field: their position in the declared
/// station list decides where they are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    /// Short code used by stop templates (e.g. `"KA"`).
    #[serde(rename = "kurz")]
    pub code: String,
    /// Display name (e.g. `"Karlsruhe Hbf"`).
    pub name: String,
}

impl Station {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Header label: the short code or the full name.
    pub fn label(&self, short: bool) -> &str {
        if short { &self.code } else { &self.name }
    }
}
