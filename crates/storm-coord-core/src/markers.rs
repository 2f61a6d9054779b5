// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::filter::FilterCriteria;
use crate::model::{AnalysisPoint, Calculation};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub distance: f64,
}

/// What a tile map needs to draw one analysis: the reference point, the
/// search radius for the active filter, and one marker per located resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOverlay {
    pub center: Option<Marker>,
    pub radius_miles: Option<f64>,
    pub markers: Vec<Marker>,
}

pub fn overlay(point: Option<&AnalysisPoint>, records: &[Calculation], filter: &FilterCriteria) -> MapOverlay {
    let center = point.map(|p| Marker {
        latitude: p.latitude,
        longitude: p.longitude,
        label: p.label.clone(),
        distance: 0.0,
    });
    let markers = records
        .iter()
        .filter_map(|r| {
            let c = r.contractor.coordinate()?;
            Some(Marker {
                latitude: c.latitude(),
                longitude: c.longitude(),
                label: r.contractor.display_name(),
                distance: r.distance,
            })
        })
        .collect();
    MapOverlay {
        center,
        radius_miles: filter.effective_radius_miles(),
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contractor;

    #[test]
    fn test_overlay_skips_unlocated() {
        let records = vec![
            Calculation {
                contractor: Contractor {
                    name: Some("Located".to_string()),
                    latitude: Some(33.1),
                    longitude: Some(-84.2),
                    ..Default::default()
                },
                distance: 8.0,
                duration: 524,
            },
            Calculation {
                contractor: Contractor::default(),
                distance: 3.0,
                duration: 196,
            },
        ];
        let point = AnalysisPoint {
            id: 1,
            label: "Substation 14".to_string(),
            latitude: 33.0,
            longitude: -84.0,
            created_at: None,
        };
        let o = overlay(Some(&point), &records, &FilterCriteria::from_distance(20.0));
        assert_eq!(o.markers.len(), 1);
        assert_eq!(o.markers[0].label, "Located");
        assert!((o.radius_miles.unwrap() - 20.0).abs() < 1e-9);
        assert_eq!(o.center.unwrap().label, "Substation 14");
    }

    #[test]
    fn test_overlay_without_point_or_filter() {
        let o = overlay(None, &[], &FilterCriteria::default());
        assert!(o.center.is_none());
        assert!(o.radius_miles.is_none());
        assert!(o.markers.is_empty());
    }
}
