//! Timetable input files.
//!
//! The input is a single JSON document:
//!
//! ```json
//! {
//!   "allgemein": {
//!     "bf": [{"kurz": "KA", "name": "Karlsruhe Hbf"}, ...],
//!     "linien": [{"optionen": {...}, "fahrten": [...]}, ...]
//!   },
//!   "fpl": {...}
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::Station;
use crate::layout::DiagramConfig;
use crate::schedule::Line;

/// Errors raised while reading an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid timetable
    #[error("invalid timetable: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A complete timetable: stations, lines and diagram settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimetableInput {
    #[serde(rename = "allgemein")]
    pub general: General,
    #[serde(rename = "fpl", default)]
    pub diagram: DiagramConfig,
}

/// Stations and lines shared by every diagram of a timetable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct General {
    #[serde(rename = "bf")]
    pub stations: Vec<Station>,
    #[serde(rename = "linien", default)]
    pub lines: Vec<Line>,
}

impl TimetableInput {
    /// Parse a timetable from JSON text.
    pub fn parse(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a timetable file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let input = Self::parse(&contents)?;
        debug!(
            path = %path.display(),
            stations = input.general.stations.len(),
            lines = input.general.lines.len(),
            "loaded timetable"
        );
        Ok(input)
    }
}
