//! Diagram layout: where stations, times and runs land on the page.
//!
//! Stations are spread along the horizontal axis in declared order. Time
//! runs downwards and is split into fixed-width page windows, each drawn
//! as its own picture.

mod axis;
mod compose;
mod config;
mod error;
mod pages;

pub use axis::{StationAxis, x_coordinate};
pub use compose::{Compositor, TimeScale};
pub use config::{
    CornerTexts, DiagramConfig, PAGE_COUNT_TOKEN, PAGE_NUMBER_TOKEN, PageConfig, StationTimeText,
    StyleSections, TextOptions, TimeAxis, TimeGrid, fill_page_tokens,
};
pub use error::LayoutError;
pub use pages::{Page, plan_pages};
