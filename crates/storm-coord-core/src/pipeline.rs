// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::filter::FilterCriteria;
use crate::model::Calculation;
use crate::sort::SortSpec;

/// Filters then orders a set of calculations. Pure; callers re-run it on
/// every change to the inputs.
pub fn process(
    records: &[Calculation],
    criteria: &FilterCriteria,
    sort: &SortSpec,
) -> Vec<Calculation> {
    let mut kept = criteria.apply(records);
    sort.sort(&mut kept);
    log::debug!(
        "Processed calculations — input={} kept={} sort={}",
        records.len(),
        kept.len(),
        sort.field
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Contractor;
    use crate::sort::{SortDirection, SortField};

    fn rec(distance: f64) -> Calculation {
        Calculation {
            contractor: Contractor::default(),
            distance,
            duration: crate::geo::travel_seconds(distance),
        }
    }

    #[test]
    fn test_empty_input() {
        let out = process(&[], &FilterCriteria::from_distance(10.0), &SortSpec::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_everything_filtered_out() {
        let records = vec![rec(30.0), rec(40.0)];
        let out = process(
            &records,
            &FilterCriteria::new(Some(5.0), None).unwrap(),
            &SortSpec::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_filter_then_sort_descending() {
        let records = vec![rec(15.0), rec(25.0), rec(5.0)];
        let out = process(
            &records,
            &FilterCriteria::new(Some(20.0), None).unwrap(),
            &SortSpec::new(SortField::Duration, SortDirection::Desc),
        );
        let distances: Vec<f64> = out.iter().map(|r| r.distance).collect();
        assert_eq!(distances, [15.0, 5.0]);
    }
}
