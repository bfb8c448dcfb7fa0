//! Expansion of a line's stop pattern into concrete runs.
//!
//! Every run starts from the same normalized stop pattern. Overridden stops
//! take their times from the run; the stops after an override inherit its
//! delay until the next override. Finally the whole run is shifted so that
//! its first departure lands on the run's anchor.

use tracing::debug;

use super::error::ResolveError;
use super::types::{Line, LineOptions, RunDescriptor, StopEntry, TrackEntry};
use crate::domain::{OptionValue, StyleOptions};

/// A stop with numeric times, in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub station: String,
    pub arrival: f64,
    pub departure: f64,
}

impl Stop {
    pub fn new(station: impl Into<String>, arrival: f64, departure: f64) -> Self {
        Self {
            station: station.into(),
            arrival,
            departure,
        }
    }

    fn shifted(&self, by: f64) -> Self {
        Self {
            station: self.station.clone(),
            arrival: self.arrival + by,
            departure: self.departure + by,
        }
    }
}

/// A line's stop pattern with every time parsed to minutes.
///
/// Built once per line and shared by all of its runs.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTemplate {
    stops: Vec<Stop>,
}

impl StopTemplate {
    /// Parse the input stop list.
    pub fn parse(entries: &[StopEntry]) -> Result<Self, ResolveError> {
        let stops = entries
            .iter()
            .map(parse_stop)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { stops })
    }

    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }
}

fn parse_stop(entry: &StopEntry) -> Result<Stop, ResolveError> {
    Ok(Stop::new(
        entry.0.clone(),
        entry.1.to_minutes()?,
        entry.2.to_minutes()?,
    ))
}

/// Line-wide defaults a run starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub name: String,
    pub color: Option<String>,
    pub style: StyleOptions,
    /// Default track per template stop, empty where none is given.
    pub tracks: Vec<String>,
}

impl LineStyle {
    /// Collect the defaults of `options`, aligning tracks to `template`.
    pub fn new(options: &LineOptions, template: &StopTemplate) -> Self {
        Self {
            name: options.name.clone(),
            color: options.color.clone(),
            style: options.style.clone(),
            tracks: template
                .stops()
                .iter()
                .map(|stop| find_track(&options.tracks, &stop.station).unwrap_or_default())
                .collect(),
        }
    }
}

fn find_track(entries: &[TrackEntry], station: &str) -> Option<String> {
    entries
        .iter()
        .find(|entry| entry.0 == station)
        .map(|entry| entry.1.clone())
}

/// A concrete run, ready to be drawn.
///
/// Stops are in template order and cover every template stop. The first
/// stop's departure equals the run's anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub name: String,
    pub style: StyleOptions,
    pub stops: Vec<Stop>,
    /// Track per stop, empty where none is known.
    pub tracks: Vec<String>,
}

impl ResolvedRun {
    /// Arrival at the first stop; decides which page the run is drawn on.
    pub fn first_arrival(&self) -> Option<f64> {
        self.stops.first().map(|stop| stop.arrival)
    }
}

/// Resolve one run of a line.
pub fn resolve_run(
    template: &StopTemplate,
    line: &LineStyle,
    run: &RunDescriptor,
) -> Result<ResolvedRun, ResolveError> {
    let anchor = run.anchor()?;

    let mut stops = template.stops().to_vec();
    let mut tracks = line.tracks.clone();
    let mut name = line.name.clone();
    let mut color = line.color.clone();
    let mut extra_style = None;

    if let Some(overrides) = run.overrides() {
        if let Some(new_name) = &overrides.name {
            name = new_name.clone();
        }
        if let Some(new_color) = &overrides.color {
            color = Some(new_color.clone());
        }
        extra_style = overrides.style.as_ref();
        if let Some(entries) = &overrides.stops {
            stops = apply_time_overrides(template, entries)?;
        }
        if let Some(entries) = &overrides.tracks {
            apply_track_overrides(template, &mut tracks, entries);
        }
    }

    let mut style = StyleOptions::new();
    if let Some(color) = color {
        style.set(color, OptionValue::Flag);
    }
    style.merge(&line.style);
    if let Some(extra) = extra_style {
        style.merge(extra);
    }

    let first_departure = stops
        .first()
        .map(|stop| stop.departure)
        .ok_or(ResolveError::EmptyTemplate)?;
    // Subtract before adding so the first departure lands exactly on the anchor
    let stops = stops
        .into_iter()
        .map(|stop| Stop {
            arrival: stop.arrival - first_departure + anchor,
            departure: stop.departure - first_departure + anchor,
            station: stop.station,
        })
        .collect();

    Ok(ResolvedRun {
        name,
        style,
        stops,
        tracks,
    })
}

/// Rebuild the stop times from a partial override list.
///
/// Walks the template in order. An overridden stop takes the override's
/// times and sets the carried delay to its departure shift; every other
/// stop is the template stop moved by the carried delay.
fn apply_time_overrides(
    template: &StopTemplate,
    entries: &[StopEntry],
) -> Result<Vec<Stop>, ResolveError> {
    log_unknown_stations(template, entries.iter().map(|e| e.station()), "time");

    let mut delay = 0.0;
    let mut stops = Vec::with_capacity(template.stops().len());

    for stop in template.stops() {
        match entries.iter().find(|entry| entry.station() == stop.station) {
            Some(entry) => {
                let replaced = parse_stop(entry)?;
                delay = replaced.departure - stop.departure;
                stops.push(replaced);
            }
            None => stops.push(stop.shifted(delay)),
        }
    }

    Ok(stops)
}

fn apply_track_overrides(template: &StopTemplate, tracks: &mut [String], entries: &[TrackEntry]) {
    log_unknown_stations(template, entries.iter().map(|e| e.0.as_str()), "track");

    for (stop, track) in template.stops().iter().zip(tracks.iter_mut()) {
        if let Some(new_track) = find_track(entries, &stop.station) {
            *track = new_track;
        }
    }
}

fn log_unknown_stations<'a>(
    template: &StopTemplate,
    stations: impl Iterator<Item = &'a str>,
    kind: &str,
) {
    for station in stations {
        if !template.stops().iter().any(|stop| stop.station == station) {
            debug!(station, kind, "override names a station outside the stop pattern, skipping");
        }
    }
}

/// Resolve every run of a line, in schedule order.
pub fn resolve_line(line: &Line) -> Result<Vec<ResolvedRun>, ResolveError> {
    let template = StopTemplate::parse(&line.options.stops)?;
    let style = LineStyle::new(&line.options, &template);

    let runs = line
        .runs
        .iter()
        .map(|run| resolve_run(&template, &style, run))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(line = %style.name, runs = runs.len(), "resolved line");
    Ok(runs)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
