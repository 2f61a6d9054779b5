// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::Coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A reference location the user analyzes resources against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPoint {
    pub id: i64,
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AnalysisPoint {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(Some(self.latitude), Some(self.longitude))
    }
}

/// Body sent to the backend when creating a point, either from a map click
/// (explicit coordinate) or from a geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDraft {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointDraft {
    pub fn at(label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            label: label.into(),
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

/// A contractor or crew resource as the backend reports it.
///
/// Every descriptive attribute is optional. When ordering, a missing number
/// counts as `0` and a missing string as `""`; see [`crate::sort::SortField`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contractor {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub classification: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub region: Option<String>,
    pub bird_rep: Option<String>,
    pub union_status: Option<String>,
    pub equipment: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub crew_count: Option<u32>,
    pub lineworker_count: Option<u32>,
    pub bucket_truck_count: Option<u32>,
    pub digger_derrick_count: Option<u32>,
}

impl Contractor {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    /// Name for display: contractor name, then company, then the id.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .or(self.company.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| match self.id {
                Some(id) => format!("#{}", id),
                None => "(unnamed)".to_string(),
            })
    }
}

/// Distance and travel time from one analysis point to one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    #[serde(alias = "resource")]
    pub contractor: Contractor,
    /// Miles.
    #[serde(deserialize_with = "deserialize_miles")]
    pub distance: f64,
    /// Seconds.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub duration: u64,
}

impl Calculation {
    pub fn hours(&self) -> f64 {
        crate::geo::miles_to_hours(self.distance)
    }
}

fn deserialize_miles<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let miles = f64::deserialize(deserializer)?;
    if !miles.is_finite() || miles < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "distance must be a non-negative number of miles, got {}",
            miles
        )));
    }
    Ok(miles)
}

// The backend is inconsistent about integer vs. fractional seconds.
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "duration must be a non-negative number of seconds, got {}",
            secs
        )));
    }
    Ok(secs.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_from_backend_json() {
        let json = r#"{
            "distance": 12.5,
            "duration": 818.2,
            "contractor": {
                "id": 7,
                "name": "Palmetto Line Services",
                "company": "Palmetto",
                "birdRep": "J. Alvarez",
                "crewCount": 4,
                "latitude": 33.9,
                "longitude": -84.1,
                "unknownField": "ignored"
            }
        }"#;
        let calc: Calculation = serde_json::from_str(json).unwrap();
        assert_eq!(calc.distance, 12.5);
        assert_eq!(calc.duration, 818);
        assert_eq!(calc.contractor.bird_rep.as_deref(), Some("J. Alvarez"));
        assert_eq!(calc.contractor.crew_count, Some(4));
        assert!(calc.contractor.rating.is_none());
        assert!(calc.contractor.coordinate().is_some());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let json = r#"{"distance": 1.0, "duration": -5, "contractor": {}}"#;
        assert!(serde_json::from_str::<Calculation>(json).is_err());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let json = r#"{"distance": -5.0, "duration": 10, "contractor": {"name": "B"}}"#;
        assert!(serde_json::from_str::<Calculation>(json).is_err());

        let json = r#"{"distance": 0.0, "duration": 0, "contractor": {}}"#;
        let calc: Calculation = serde_json::from_str(json).unwrap();
        assert_eq!(calc.distance, 0.0);
    }

    #[test]
    fn test_resource_alias() {
        let json = r#"{"distance": 1.0, "duration": 65, "resource": {"name": "A"}}"#;
        let calc: Calculation = serde_json::from_str(json).unwrap();
        assert_eq!(calc.contractor.display_name(), "A");
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut c = Contractor::default();
        assert_eq!(c.display_name(), "(unnamed)");
        c.id = Some(12);
        assert_eq!(c.display_name(), "#12");
        c.company = Some("Dixie Electric".to_string());
        assert_eq!(c.display_name(), "Dixie Electric");
    }

    #[test]
    fn test_point_draft_serializes_camel_case() {
        let coord = Coordinate::new(30.0, -90.0).unwrap();
        let body = serde_json::to_value(PointDraft::at("Staging A", coord)).unwrap();
        assert_eq!(body["label"], "Staging A");
        assert_eq!(body["latitude"], 30.0);
        assert_eq!(body["longitude"], -90.0);
    }
}
