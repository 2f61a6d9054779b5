// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Fixed average road speed used for every travel-time estimate.
pub const AVERAGE_SPEED_MPH: f64 = 55.0;

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Rejects anything outside [-90, 90] x [-180, 180], NaN included.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::Validation(format!(
                "latitude {} is outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::Validation(format!(
                "longitude {} is outside [-180, 180]",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Builds a coordinate from optional parts, e.g. a contractor record that
    /// may not have been located yet.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }
}

impl std::str::FromStr for Coordinate {
    type Err = Error;

    /// Parses `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| Error::Validation(format!("expected 'lat,lon', got '{}'", s)))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Validation(format!("invalid latitude '{}'", lat.trim())))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::Validation(format!("invalid longitude '{}'", lon.trim())))?;
        Self::new(lat, lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Great-circle distance in miles (haversine).
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_MILES * c
}

pub fn miles_to_hours(miles: f64) -> f64 {
    miles / AVERAGE_SPEED_MPH
}

pub fn hours_to_miles(hours: f64) -> f64 {
    hours * AVERAGE_SPEED_MPH
}

/// Travel time in whole seconds at the fixed average speed.
pub fn travel_seconds(miles: f64) -> u64 {
    (miles_to_hours(miles) * 3600.0).round().max(0.0) as u64
}

/// Distance from every origin to every destination. Row `i` belongs to
/// `origins[i]`, column `j` to `destinations[j]`.
pub fn distance_matrix(origins: &[Coordinate], destinations: &[Coordinate]) -> Vec<Vec<f64>> {
    origins
        .iter()
        .map(|o| destinations.iter().map(|d| distance_miles(o, d)).collect())
        .collect()
}

/// Index and distance of the closest destination, or `None` when there are
/// no destinations.
pub fn nearest(origin: &Coordinate, destinations: &[Coordinate]) -> Option<(usize, f64)> {
    destinations
        .iter()
        .enumerate()
        .map(|(i, d)| (i, distance_miles(origin, d)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}
