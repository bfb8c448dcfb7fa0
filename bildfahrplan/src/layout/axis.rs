//! Horizontal station placement.

use std::collections::HashMap;

use super::config::DiagramConfig;
use super::error::LayoutError;
use crate::domain::Station;

/// Horizontal position of the station at `index` out of `count`.
///
/// Stations are spread evenly between the left margin and the right margin.
///
/// # Examples
///
/// ```
/// use bildfahrplan::layout::x_coordinate;
///
/// assert_eq!(x_coordinate(1, 3, 0.0, 0.0, 19.0).unwrap(), 9.5);
/// assert!(x_coordinate(0, 1, 0.0, 0.0, 19.0).is_err());
/// ```
pub fn x_coordinate(
    index: usize,
    count: usize,
    margin_left: f64,
    margin_right: f64,
    canvas_width: f64,
) -> Result<f64, LayoutError> {
    if count < 2 {
        return Err(LayoutError::DegenerateAxis { count });
    }
    let fraction = index as f64 / (count - 1) as f64;
    Ok(margin_left + fraction * (canvas_width - margin_right - margin_left))
}

/// Station positions for one diagram.
///
/// Stations keep their declared order. Duplicate codes share the position
/// of the last station declared with that code.
#[derive(Debug, Clone, PartialEq)]
pub struct StationAxis {
    stations: Vec<(Station, f64)>,
    by_code: HashMap<String, f64>,
}

impl StationAxis {
    pub fn build(stations: &[Station], config: &DiagramConfig) -> Result<Self, LayoutError> {
        let placed = stations
            .iter()
            .enumerate()
            .map(|(i, station)| {
                let x = x_coordinate(
                    i,
                    stations.len(),
                    config.margin_left,
                    config.margin_right,
                    config.canvas_width,
                )?;
                Ok((station.clone(), x))
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        // Count is checked even for an empty list, where the map above never runs
        if placed.len() < 2 {
            return Err(LayoutError::DegenerateAxis {
                count: placed.len(),
            });
        }

        let by_code = placed
            .iter()
            .map(|(station, x)| (station.code.clone(), *x))
            .collect();

        Ok(Self {
            stations: placed,
            by_code,
        })
    }

    /// Position of the station with the given code.
    pub fn x(&self, code: &str) -> Result<f64, LayoutError> {
        self.by_code
            .get(code)
            .copied()
            .ok_or_else(|| LayoutError::UnknownStation(code.to_string()))
    }

    /// Stations in declared order with their positions.
    pub fn stations(&self) -> &[(Station, f64)] {
        &self.stations
    }
}
