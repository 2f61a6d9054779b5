// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::Calculation;
use serde::Serialize;

/// Radius for the "within 10 mi" figure on the results header.
pub const NEARBY_THRESHOLD_MILES: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// `None` when there are no records.
    pub closest: Option<f64>,
    /// `None` when there are no records.
    pub average: Option<f64>,
    pub count: usize,
}

pub fn summarize(records: &[Calculation]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }
    let closest = records
        .iter()
        .map(|r| r.distance)
        .fold(f64::INFINITY, f64::min);
    let total: f64 = records.iter().map(|r| r.distance).sum();
    Summary {
        closest: Some(closest),
        average: Some(total / records.len() as f64),
        count: records.len(),
    }
}

pub fn within_threshold(records: &[Calculation], miles: f64) -> usize {
    records.iter().filter(|r| r.distance <= miles).count()
}
