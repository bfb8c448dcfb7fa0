//! Diagram configuration.
//!
//! Read from the `fpl` section of the input. Lengths are in centimetres,
//! times in minutes. Every field has a default, so `{}` is a valid
//! configuration.

use std::collections::HashMap;

use serde::Deserialize;

use super::error::LayoutError;
use crate::domain::{ElementOption, StyleOptions};
use crate::tikz::Corner;

/// Printable width of an A4 page with 1 cm margins.
const DEFAULT_CANVAS_WIDTH: f64 = 21.0 - 2.0;

/// Printable height of an A4 page, leaving room for the overlays.
const DEFAULT_CANVAS_HEIGHT: f64 = 29.7 - 2.05;

/// Configuration for the diagram layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Space above the station labels.
    #[serde(rename = "platzOben")]
    pub margin_top: f64,

    /// Space below the station lines.
    #[serde(rename = "platzUnten")]
    pub margin_bottom: f64,

    /// Space left of the first station.
    #[serde(rename = "platzLinks")]
    pub margin_left: f64,

    /// Space right of the last station.
    #[serde(rename = "platzRechts")]
    pub margin_right: f64,

    #[serde(rename = "breite")]
    pub canvas_width: f64,

    #[serde(rename = "hoehe")]
    pub canvas_height: f64,

    /// Label stations with their short code instead of their name.
    #[serde(rename = "bfKurz")]
    pub short_station_labels: bool,

    /// Include seconds in time labels.
    #[serde(rename = "sekunden")]
    pub label_seconds: bool,

    #[serde(rename = "textOptionen")]
    pub text: TextOptions,

    #[serde(rename = "stilOptionen")]
    pub styles: StyleSections,

    /// Per-station arrival/departure label options, keyed by station code.
    #[serde(rename = "zeitenText")]
    pub station_times: HashMap<String, StationTimeText>,

    /// Corner overlay templates.
    #[serde(rename = "ecken")]
    pub corners: CornerTexts,

    #[serde(rename = "eckenOptionen")]
    pub corner_style: StyleOptions,

    #[serde(rename = "seiten")]
    pub pages: PageConfig,

    #[serde(rename = "raster")]
    pub grid: TimeGrid,

    #[serde(rename = "zeitachse")]
    pub time_axis: TimeAxis,
}

impl DiagramConfig {
    /// Check the values that would otherwise loop or divide by zero.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.pages.width > 0.0) {
            return Err(LayoutError::InvalidPageWidth(self.pages.width));
        }
        if !(self.grid.step > 0.0) {
            return Err(LayoutError::InvalidGridStep(self.grid.step));
        }
        Ok(())
    }

    /// Label options for one station's arrival or departure times.
    pub fn station_time_text(&self, station: &str) -> Option<&StationTimeText> {
        self.station_times.get(station)
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            margin_top: 0.0,
            margin_bottom: 0.0,
            margin_left: 0.0,
            margin_right: 0.0,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            short_station_labels: false,
            label_seconds: false,
            text: TextOptions::default(),
            styles: StyleSections::default(),
            station_times: HashMap::new(),
            corners: CornerTexts::default(),
            corner_style: StyleOptions::new(),
            pages: PageConfig::default(),
            grid: TimeGrid::default(),
            time_axis: TimeAxis::default(),
        }
    }
}

/// Options for each kind of text label.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextOptions {
    /// Station name at the top of each station line.
    #[serde(rename = "bf")]
    pub station: ElementOption,

    /// Time label at the left end of each grid line.
    #[serde(rename = "zeitLinks")]
    pub grid_left: ElementOption,

    /// Time label at the right end of each grid line.
    #[serde(rename = "zeitRechts")]
    pub grid_right: ElementOption,

    /// Run name at the first stop.
    #[serde(rename = "zugStart")]
    pub run_start: ElementOption,

    /// Run name at the last stop.
    #[serde(rename = "zugEnde")]
    pub run_end: ElementOption,

    /// Arrival time at each stop.
    #[serde(rename = "zugAn")]
    pub arrival: ElementOption,

    /// Departure time at each stop.
    #[serde(rename = "zugAb")]
    pub departure: ElementOption,

    /// Run name along each segment between stops.
    #[serde(rename = "zugFahrt")]
    pub segment: ElementOption,

    /// Track at each stop.
    #[serde(rename = "gleis")]
    pub track: ElementOption,
}

/// Style options merged into each group of strokes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleSections {
    /// Station lines and the time grid.
    #[serde(rename = "kopfzeile")]
    pub header: StyleOptions,

    /// Time grid only, applied after `header`.
    #[serde(rename = "raster")]
    pub grid: StyleOptions,

    /// Every run, applied before the run's own style.
    #[serde(rename = "zug")]
    pub run: StyleOptions,
}

/// Arrival and departure label options for one station.
///
/// Written as a two-element array: `[arrival, departure]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "(ElementOption, ElementOption)")]
pub struct StationTimeText {
    pub arrival: ElementOption,
    pub departure: ElementOption,
}

impl From<(ElementOption, ElementOption)> for StationTimeText {
    fn from((arrival, departure): (ElementOption, ElementOption)) -> Self {
        Self {
            arrival,
            departure,
        }
    }
}

/// Overlay text templates for the four page corners.
///
/// `{seite}` is replaced by the page number and `{seiten}` by the page count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CornerTexts {
    #[serde(rename = "obenLinks")]
    pub top_left: Option<String>,
    #[serde(rename = "obenRechts")]
    pub top_right: Option<String>,
    #[serde(rename = "untenLinks")]
    pub bottom_left: Option<String>,
    #[serde(rename = "untenRechts")]
    pub bottom_right: Option<String>,
}

/// Token replaced by the 1-based page number.
pub const PAGE_NUMBER_TOKEN: &str = "{seite}";

/// Token replaced by the number of pages.
pub const PAGE_COUNT_TOKEN: &str = "{seiten}";

impl CornerTexts {
    /// Configured templates in fixed corner order.
    pub fn iter(&self) -> impl Iterator<Item = (Corner, &str)> {
        [
            (Corner::TopLeft, &self.top_left),
            (Corner::TopRight, &self.top_right),
            (Corner::BottomLeft, &self.bottom_left),
            (Corner::BottomRight, &self.bottom_right),
        ]
        .into_iter()
        .filter_map(|(corner, text)| text.as_deref().map(|t| (corner, t)))
    }
}

/// Substitute page number and count into an overlay template.
pub fn fill_page_tokens(template: &str, page_index: usize, page_count: usize) -> String {
    template
        .replace(PAGE_COUNT_TOKEN, &page_count.to_string())
        .replace(PAGE_NUMBER_TOKEN, &(page_index + 1).to_string())
}

/// Time window covered by each page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Start of the first page, in minutes.
    pub start: f64,
    /// Minutes covered by one page.
    #[serde(rename = "breite")]
    pub width: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            start: 400.0,
            width: 300.0,
        }
    }
}

/// Horizontal grid lines, in minutes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeGrid {
    #[serde(rename = "von")]
    pub from: f64,
    #[serde(rename = "bis")]
    pub to: f64,
    #[serde(rename = "schritt")]
    pub step: f64,
}

impl TimeGrid {
    /// Grid times from `from` up to and including `to`.
    ///
    /// Empty when the step is not positive.
    pub fn times(&self) -> Vec<f64> {
        let mut times = Vec::new();
        if !(self.step > 0.0) {
            return times;
        }
        let mut t = self.from;
        while t <= self.to {
            times.push(t);
            t += self.step;
        }
        times
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            from: 420.0,
            to: 900.0,
            step: 60.0,
        }
    }
}

/// Mapping from a page's time window onto the vertical drawing band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeAxis {
    /// Vertical extent of one page window; negative draws downwards.
    #[serde(rename = "skala")]
    pub scale: f64,
    /// Vertical position of the page start.
    #[serde(rename = "versatz")]
    pub offset: f64,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            scale: -24.0,
            offset: -3.0,
        }
    }
}
