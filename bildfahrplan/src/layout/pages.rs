//! Splitting the schedule into fixed-width page windows.
//!
//! Pages are found by probing: page 0, 1, 2, ... are checked in turn until
//! one holds no run. A run belongs to the page containing its first
//! arrival and is drawn whole on that page, even if it runs past the end.
//!
//! A gap of more than one page width ends the probing early; runs after the
//! gap are not drawn. This is logged as a warning.

use tracing::{debug, warn};

use super::config::PageConfig;
use crate::schedule::ResolvedRun;

/// A page's time window, `[start, end)` in minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Page {
    /// Window of the page at `index`.
    pub fn window(config: &PageConfig, index: usize) -> Self {
        let start = config.start + index as f64 * config.width;
        Self {
            index,
            start,
            end: start + config.width,
        }
    }

    pub fn contains(&self, minute: f64) -> bool {
        self.start <= minute && minute < self.end
    }

    /// Whether `run` is drawn on this page.
    pub fn holds(&self, run: &ResolvedRun) -> bool {
        run.first_arrival().is_some_and(|m| self.contains(m))
    }
}

/// Number of pages to draw.
///
/// Counts pages from index 0 until the first page without runs. A
/// non-positive page width plans no pages.
pub fn plan_pages(runs: &[ResolvedRun], config: &PageConfig) -> usize {
    if !(config.width > 0.0) {
        return 0;
    }

    let mut count = 0;
    loop {
        let page = Page::window(config, count);
        if !runs.iter().any(|run| page.holds(run)) {
            break;
        }
        count += 1;
    }

    let placed = runs
        .iter()
        .filter(|run| (0..count).any(|i| Page::window(config, i).holds(run)))
        .count();
    if placed < runs.len() {
        warn!(
            pages = count,
            dropped = runs.len() - placed,
            "some runs start outside the planned pages and are not drawn"
        );
    }

    debug!(pages = count, runs = runs.len(), "planned pages");
    count
}
