//! Page composition.
//!
//! Each page is drawn in three parts: the header (station lines, time grid
//! and labels), the body (every run starting inside the page window) and
//! the corner overlays.

use super::axis::StationAxis;
use super::config::{DiagramConfig, TimeAxis, fill_page_tokens};
use super::error::LayoutError;
use super::pages::Page;
use crate::domain::{ElementOption, StyleOptions, format_minutes};
use crate::schedule::ResolvedRun;
use crate::tikz::{DrawingOp, render_page};

/// Page-local mapping from minutes to vertical position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: f64,
    end: f64,
    scale: f64,
    offset: f64,
}

impl TimeScale {
    pub fn new(page: &Page, axis: &TimeAxis) -> Self {
        Self {
            start: page.start,
            end: page.end,
            scale: axis.scale,
            offset: axis.offset,
        }
    }

    /// Vertical position of `minute`.
    pub fn y(&self, minute: f64) -> f64 {
        (minute - self.start) / (self.end - self.start) * self.scale + self.offset
    }
}

/// Draws pages of one diagram.
pub struct Compositor<'a> {
    config: &'a DiagramConfig,
    axis: &'a StationAxis,
    page_count: usize,
}

impl<'a> Compositor<'a> {
    pub fn new(config: &'a DiagramConfig, axis: &'a StationAxis, page_count: usize) -> Self {
        Self {
            config,
            axis,
            page_count,
        }
    }

    /// Markup for one page, including the runs in its window.
    pub fn compose_page(&self, page: &Page, runs: &[ResolvedRun]) -> Result<String, LayoutError> {
        Ok(render_page(&self.page_ops(page, runs)?))
    }

    /// Drawing operations for one page, in drawing order.
    pub fn page_ops(
        &self,
        page: &Page,
        runs: &[ResolvedRun],
    ) -> Result<Vec<DrawingOp>, LayoutError> {
        let scale = TimeScale::new(page, &self.config.time_axis);

        let mut ops = self.header(&scale);
        for run in runs.iter().filter(|run| page.holds(run)) {
            ops.push(self.run(run, &scale)?);
        }
        ops.extend(self.overlays(page));
        Ok(ops)
    }

    /// Station lines, page frame and time grid.
    pub fn header(&self, scale: &TimeScale) -> Vec<DrawingOp> {
        let config = self.config;
        let top = -config.margin_top;
        let bottom = -(config.canvas_height - config.margin_bottom);

        let mut stations = Vec::new();
        for (station, x) in self.axis.stations() {
            stations.push(DrawingOp::point(*x, top));
            if let Some(options) = config.text.station.apply(StyleOptions::new().flag("above")) {
                stations.push(DrawingOp::node(
                    station.label(config.short_station_labels),
                    options,
                ));
            }
            stations.push(DrawingOp::PathLine);
            stations.push(DrawingOp::point(*x, bottom));
        }

        let mut ops = vec![
            DrawingOp::block(
                stations,
                StyleOptions::new().flag("gray").merged(&config.styles.header),
            ),
            // Invisible diagonal so every page has the same bounding box
            DrawingOp::block(
                vec![
                    DrawingOp::point(0.0, 0.0),
                    DrawingOp::PathLine,
                    DrawingOp::point(config.canvas_width, -config.canvas_height),
                ],
                StyleOptions::new().value("draw", "none"),
            ),
        ];

        let left = config.margin_left;
        let right = config.canvas_width - config.margin_right;
        let mut grid = Vec::new();
        for minute in config.grid.times() {
            let y = scale.y(minute);
            let label = format_minutes(minute, config.label_seconds);

            grid.push(DrawingOp::point(left, y));
            if let Some(options) = config.text.grid_left.apply(StyleOptions::new().flag("left")) {
                grid.push(DrawingOp::node(label.clone(), options));
            }
            grid.push(DrawingOp::PathLine);
            grid.push(DrawingOp::point(right, y));
            if let Some(options) = config.text.grid_right.apply(StyleOptions::new().flag("right")) {
                grid.push(DrawingOp::node(label, options));
            }
        }
        if !grid.is_empty() {
            ops.push(DrawingOp::block(
                grid,
                StyleOptions::new()
                    .flag("gray!50!white")
                    .merged(&config.styles.header)
                    .merged(&config.styles.grid),
            ));
        }

        ops
    }

    /// One run as a single labelled path through all of its stops.
    pub fn run(&self, run: &ResolvedRun, scale: &TimeScale) -> Result<DrawingOp, LayoutError> {
        let text = &self.config.text;
        let mut ops = Vec::new();

        for (i, stop) in run.stops.iter().enumerate() {
            let x = self.axis.x(&stop.station)?;
            let station_text = self.config.station_time_text(&stop.station);

            if i > 0 {
                let segment = StyleOptions::new().flag("sloped").flag("above");
                ops.push(match text.segment.apply(segment) {
                    Some(options) => DrawingOp::labeled_line(run.name.clone(), options),
                    None => DrawingOp::PathLine,
                });
            }

            // Arrival
            ops.push(DrawingOp::point(x, scale.y(stop.arrival)));
            if i == 0 {
                if let Some(options) = text.run_start.apply(StyleOptions::new().flag("left")) {
                    ops.push(DrawingOp::node(run.name.clone(), options));
                }
            }
            if let Some(options) =
                time_label_options(&text.arrival, station_text.map(|t| &t.arrival))
            {
                ops.push(DrawingOp::node(self.time_text(stop.arrival), options));
            }
            if let Some(track) = run.tracks.get(i).filter(|t| !t.is_empty()) {
                if let Some(options) = text.track.apply(StyleOptions::new().flag("right")) {
                    ops.push(DrawingOp::node(track.clone(), options));
                }
            }

            ops.push(DrawingOp::PathLine);

            // Departure
            ops.push(DrawingOp::point(x, scale.y(stop.departure)));
            if let Some(options) =
                time_label_options(&text.departure, station_text.map(|t| &t.departure))
            {
                ops.push(DrawingOp::node(self.time_text(stop.departure), options));
            }
        }

        if let Some(options) = text.run_end.apply(StyleOptions::new().flag("right")) {
            ops.push(DrawingOp::node(run.name.clone(), options));
        }

        Ok(DrawingOp::block(ops, self.config.styles.run.merged(&run.style)))
    }

    /// Corner texts with page number and count filled in.
    pub fn overlays(&self, page: &Page) -> Vec<DrawingOp> {
        self.config
            .corners
            .iter()
            .map(|(corner, template)| DrawingOp::Overlay {
                text: fill_page_tokens(template, page.index, self.page_count),
                corner,
                options: self.config.corner_style.clone(),
            })
            .collect()
    }

    fn time_text(&self, minute: f64) -> String {
        format_minutes(minute, self.config.label_seconds)
    }
}

/// Options for a time label, or `None` if either the global or the
/// per-station setting suppresses it.
fn time_label_options(
    global: &ElementOption,
    station: Option<&ElementOption>,
) -> Option<StyleOptions> {
    let options = global.apply(StyleOptions::new().flag("left"))?;
    match station {
        Some(station) => station.apply(options),
        None => Some(options),
    }
}
