// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::Coordinate;
use crate::{Error, Result};
use log::{debug, info};
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Turns free text (street address, city, or postal code) into a coordinate.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Coordinate>;
}

/// One hit from a Nominatim-style search. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

fn zip_pattern() -> &'static Regex {
    static ZIP: OnceLock<Regex> = OnceLock::new();
    ZIP.get_or_init(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("static regex"))
}

/// True for a bare US ZIP or ZIP+4.
pub fn is_postal_code(query: &str) -> bool {
    zip_pattern().is_match(query.trim())
}

pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    endpoint: Url,
}

impl NominatimGeocoder {
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    /// Search URL for `query`. Postal codes go through the structured
    /// `postalcode` parameter, which the free-text search handles poorly.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::Validation("address or zip code is required".to_string()));
        }
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json").append_pair("limit", "1");
            if is_postal_code(query) {
                pairs
                    .append_pair("postalcode", query)
                    .append_pair("countrycodes", "us");
            } else {
                pairs.append_pair("q", query);
            }
        }
        Ok(url)
    }
}

fn check_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Service(format!(
            "geocoder responded with HTTP {}",
            status.as_u16()
        )))
    }
}

/// Takes the first hit of a search response body.
fn first_hit(query: &str, body: &str) -> Result<Coordinate> {
    let hits: Vec<SearchHit> = serde_json::from_str(body)
        .map_err(|e| Error::Service(format!("geocoder returned an unreadable body: {}", e)))?;
    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound(format!("no location matches '{}'", query)))?;
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| Error::Service(format!("geocoder returned latitude '{}'", hit.lat)))?;
    let lon = hit
        .lon
        .parse::<f64>()
        .map_err(|_| Error::Service(format!("geocoder returned longitude '{}'", hit.lon)))?;
    let coordinate = Coordinate::new(lat, lon)?;
    debug!(
        "Geocoded — query={} match={} coordinate={}",
        query,
        hit.display_name.as_deref().unwrap_or("-"),
        coordinate
    );
    Ok(coordinate)
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Coordinate> {
        let url = self.search_url(query)?;
        info!("Geocoding address — query={}", query.trim());
        let response = self.client.get(url).send()?;
        check_status(response.status())?;
        let body = response.text()?;
        first_hit(query.trim(), &body)
    }
}

/// Fixed lookup table, for offline use and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticGeocoder {
    entries: Vec<(String, Coordinate)>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, query: &str, coordinate: Coordinate) -> Self {
        self.entries.push((query.trim().to_lowercase(), coordinate));
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, query: &str) -> Result<Coordinate> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Err(Error::Validation("address or zip code is required".to_string()));
        }
        self.entries
            .iter()
            .find(|(q, _)| *q == key)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::NotFound(format!("no location matches '{}'", query.trim())))
    }
}
