// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::{self, Coordinate};
use crate::model::{Calculation, Contractor};
use crate::{Error, Result};
use rayon::prelude::*;

/// Distance from each located contractor to the nearest of `destinations`.
///
/// Contractors without a usable coordinate are skipped. Output order follows
/// the input order.
pub fn calculate(contractors: &[Contractor], destinations: &[Coordinate]) -> Result<Vec<Calculation>> {
    if destinations.is_empty() {
        return Err(Error::Validation("at least one destination is required".to_string()));
    }

    let records: Vec<Calculation> = contractors
        .par_iter()
        .filter_map(|contractor| {
            let origin = contractor.coordinate()?;
            let (_, miles) = geo::nearest(&origin, destinations)?;
            Some(Calculation {
                contractor: contractor.clone(),
                distance: miles,
                duration: geo::travel_seconds(miles),
            })
        })
        .collect();

    let skipped = contractors.len() - records.len();
    if skipped > 0 {
        log::warn!(
            "Skipped contractors without coordinates — skipped={} total={}",
            skipped,
            contractors.len()
        );
    }
    log::debug!(
        "Availability distances computed — contractors={} destinations={}",
        records.len(),
        destinations.len()
    );
    Ok(records)
}

/// Per-destination distance table: one row per located contractor, one
/// column per destination.
pub fn matrix(contractors: &[Contractor], destinations: &[Coordinate]) -> Vec<(Contractor, Vec<f64>)> {
    contractors
        .par_iter()
        .filter_map(|c| {
            let origin = c.coordinate()?;
            let row = geo::distance_matrix(&[origin], destinations).pop()?;
            Some((c.clone(), row))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contractor(name: &str, lat: Option<f64>, lon: Option<f64>) -> Contractor {
        Contractor {
            name: Some(name.to_string()),
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_destination() {
        let result = calculate(&[contractor("a", Some(33.0), Some(-84.0))], &[]);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_nearest_destination_and_skips() {
        let contractors = vec![
            contractor("north", Some(35.0), Some(-84.0)),
            contractor("unlocated", None, None),
            contractor("south", Some(31.0), Some(-84.0)),
            contractor("bad", Some(123.0), Some(-84.0)),
        ];
        let dests = vec![
            Coordinate::new(34.0, -84.0).unwrap(),
            Coordinate::new(31.0, -84.0).unwrap(),
        ];
        let out = calculate(&contractors, &dests).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].contractor.name.as_deref(), Some("north"));
        assert!((out[0].distance - 69.1).abs() < 1.0);
        assert_eq!(out[0].duration, geo::travel_seconds(out[0].distance));
        assert_eq!(out[1].contractor.name.as_deref(), Some("south"));
        assert_eq!(out[1].distance, 0.0);
        assert_eq!(out[1].duration, 0);
    }

    #[test]
    fn test_empty_contractors() {
        let dests = vec![Coordinate::new(34.0, -84.0).unwrap()];
        assert!(calculate(&[], &dests).unwrap().is_empty());
    }

    #[test]
    fn test_matrix_rows() {
        let contractors = vec![
            contractor("a", Some(33.0), Some(-84.0)),
            contractor("b", None, Some(-84.0)),
        ];
        let dests = vec![
            Coordinate::new(33.0, -84.0).unwrap(),
            Coordinate::new(34.0, -84.0).unwrap(),
            Coordinate::new(35.0, -84.0).unwrap(),
        ];
        let rows = matrix(&contractors, &dests);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.len(), 3);
        assert_eq!(rows[0].1[0], 0.0);
        assert!(rows[0].1[1] < rows[0].1[2]);
    }
}
