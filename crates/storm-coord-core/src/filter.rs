// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::{hours_to_miles, miles_to_hours};
use crate::model::Calculation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Distance and travel-time limits applied to calculation records.
///
/// When both limits are set a record must satisfy both of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub max_distance_miles: Option<f64>,
    pub max_hours: Option<f64>,
}

impl FilterCriteria {
    pub fn new(max_distance_miles: Option<f64>, max_hours: Option<f64>) -> Result<Self> {
        let criteria = Self {
            max_distance_miles,
            max_hours,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    /// Distance limit with the hour limit filled in at the average speed.
    pub fn from_distance(miles: f64) -> Self {
        Self {
            max_distance_miles: Some(miles),
            max_hours: Some(miles_to_hours(miles)),
        }
    }

    /// Hour limit with the distance limit filled in at the average speed.
    pub fn from_hours(hours: f64) -> Self {
        Self {
            max_distance_miles: Some(hours_to_miles(hours)),
            max_hours: Some(hours),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_distance_miles.is_none() && self.max_hours.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("max distance", self.max_distance_miles),
            ("max hours", self.max_hours),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::Validation(format!(
                        "{} must be a non-negative number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn accepts_distance(&self, miles: f64) -> bool {
        let within_distance = self.max_distance_miles.map_or(true, |max| miles <= max);
        let within_time = self.max_hours.map_or(true, |max| miles_to_hours(miles) <= max);
        within_distance && within_time
    }

    pub fn accepts(&self, record: &Calculation) -> bool {
        self.accepts_distance(record.distance)
    }

    /// The tighter of the two limits expressed in miles, for drawing the
    /// search radius.
    pub fn effective_radius_miles(&self) -> Option<f64> {
        let from_hours = self.max_hours.map(hours_to_miles);
        match (self.max_distance_miles, from_hours) {
            (Some(d), Some(h)) => Some(d.min(h)),
            (d, h) => d.or(h),
        }
    }

    pub fn apply(&self, records: &[Calculation]) -> Vec<Calculation> {
        records.iter().filter(|r| self.accepts(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contractor;

    fn record(distance: f64) -> Calculation {
        Calculation {
            contractor: Contractor::default(),
            distance,
            duration: crate::geo::travel_seconds(distance),
        }
    }

    #[test]
    fn test_unset_accepts_everything() {
        let f = FilterCriteria::default();
        assert!(f.is_empty());
        assert!(f.accepts_distance(0.0));
        assert!(f.accepts_distance(10_000.0));
    }

    #[test]
    fn test_both_limits_enforced() {
        // 20 mi is inside 25 mi and 20/55 h = 0.36 h is inside 0.5 h.
        let f = FilterCriteria::new(Some(25.0), Some(0.5)).unwrap();
        assert!(f.accepts_distance(20.0));

        // Same distance limit, but a 0.3 h cap (16.5 mi) rejects it.
        let f = FilterCriteria::new(Some(25.0), Some(0.3)).unwrap();
        assert!(!f.accepts_distance(20.0));

        // And a generous hour cap does not rescue a record over the distance.
        let f = FilterCriteria::new(Some(15.0), Some(10.0)).unwrap();
        assert!(!f.accepts_distance(20.0));
    }

    #[test]
    fn test_limits_are_inclusive() {
        let f = FilterCriteria::new(Some(20.0), None).unwrap();
        assert!(f.accepts_distance(20.0));
        assert!(!f.accepts_distance(20.0001));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let records: Vec<_> = [3.0, 18.0, 27.0, 40.0, 55.0].into_iter().map(record).collect();
        let f = FilterCriteria::new(Some(30.0), Some(0.5)).unwrap();
        let once = f.apply(&records);
        let twice = f.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_synced_constructors() {
        let f = FilterCriteria::from_distance(27.5);
        assert_eq!(f.max_hours, Some(0.5));
        let f = FilterCriteria::from_hours(2.0);
        assert_eq!(f.max_distance_miles, Some(110.0));
    }

    #[test]
    fn test_validation() {
        assert!(FilterCriteria::new(Some(-1.0), None).is_err());
        assert!(FilterCriteria::new(None, Some(f64::NAN)).is_err());
        assert!(FilterCriteria::new(Some(0.0), Some(0.0)).is_ok());
    }

    #[test]
    fn test_effective_radius() {
        assert_eq!(FilterCriteria::default().effective_radius_miles(), None);
        let f = FilterCriteria::new(Some(25.0), Some(0.3)).unwrap();
        assert!((f.effective_radius_miles().unwrap() - 16.5).abs() < 1e-9);
        let f = FilterCriteria::new(None, Some(1.0)).unwrap();
        assert_eq!(f.effective_radius_miles(), Some(55.0));
    }
}
