// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Client-side analysis state: the reference points, the one active filter,
//! the active sort, and the calculations for the selected point.

use crate::backend::BackendClient;
use crate::export::{ExportFormat, ExportRequest};
use crate::filter::FilterCriteria;
use crate::geo::{hours_to_miles, miles_to_hours};
use crate::geocode::Geocoder;
use crate::model::{AnalysisPoint, Calculation, PointDraft};
use crate::pipeline;
use crate::sort::{SortDirection, SortField, SortSpec};
use crate::summary::{self, Summary, NEARBY_THRESHOLD_MILES};
use crate::{Error, Result};
use log::{debug, info};
use serde::Serialize;

/// Anything that can produce the calculations for an analysis point.
pub trait CalculationSource {
    fn calculations(&self, point_id: i64) -> Result<Vec<Calculation>>;
}

impl CalculationSource for BackendClient {
    fn calculations(&self, point_id: i64) -> Result<Vec<Calculation>> {
        BackendClient::calculations(self, point_id)
    }
}

/// Handed out when a fetch starts. Results carrying a ticket older than the
/// session's current generation are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    point_id: i64,
}

impl FetchTicket {
    pub fn point_id(&self) -> i64 {
        self.point_id
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub point: Option<AnalysisPoint>,
    pub filter: FilterCriteria,
    pub sort: SortSpec,
    pub records: Vec<Calculation>,
    pub summary: Summary,
    pub within_ten_miles: usize,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    points: Vec<AnalysisPoint>,
    selected: Option<i64>,
    filter: FilterCriteria,
    sort: SortSpec,
    calculations: Vec<Calculation>,
    generation: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(sort: SortSpec) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    pub fn points(&self) -> &[AnalysisPoint] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<AnalysisPoint>) {
        self.points = points;
        if let Some(id) = self.selected {
            if !self.points.iter().any(|p| p.id == id) {
                self.clear_selection();
            }
        }
    }

    /// Adds a point, replacing any existing point with the same id.
    pub fn add_point(&mut self, point: AnalysisPoint) {
        info!("Analysis point added — id={} label={}", point.id, point.label);
        match self.points.iter_mut().find(|p| p.id == point.id) {
            Some(existing) => *existing = point,
            None => self.points.push(point),
        }
    }

    pub fn remove_point(&mut self, id: i64) -> Option<AnalysisPoint> {
        let idx = self.points.iter().position(|p| p.id == id)?;
        let removed = self.points.remove(idx);
        if self.selected == Some(id) {
            self.clear_selection();
        }
        info!("Analysis point removed — id={}", id);
        Some(removed)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.calculations.clear();
        self.generation += 1;
    }

    pub fn selected_point(&self) -> Option<&AnalysisPoint> {
        let id = self.selected?;
        self.points.iter().find(|p| p.id == id)
    }

    /// Selects a point and starts a fetch for it. Calculations from any
    /// earlier selection are discarded.
    pub fn select(&mut self, id: i64) -> Result<FetchTicket> {
        if !self.points.iter().any(|p| p.id == id) {
            return Err(Error::NotFound(format!("analysis point {}", id)));
        }
        self.selected = Some(id);
        self.calculations.clear();
        self.begin_fetch()
            .ok_or_else(|| Error::NotFound(format!("analysis point {}", id)))
    }

    /// Starts a (re)fetch for the selected point, superseding any fetch still
    /// in flight.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let point_id = self.selected?;
        self.generation += 1;
        Some(FetchTicket {
            generation: self.generation,
            point_id,
        })
    }

    /// Stores fetched calculations unless a newer fetch has started since the
    /// ticket was issued. Returns whether the records were kept.
    pub fn apply_calculations(&mut self, ticket: FetchTicket, records: Vec<Calculation>) -> bool {
        if ticket.generation != self.generation || self.selected != Some(ticket.point_id) {
            debug!(
                "Dropping stale calculations — point_id={} ticket={} current={}",
                ticket.point_id, ticket.generation, self.generation
            );
            return false;
        }
        self.calculations = records;
        true
    }

    /// Selects `id` and loads its calculations from `source`.
    pub fn load(&mut self, id: i64, source: &dyn CalculationSource) -> Result<()> {
        let ticket = self.select(id)?;
        let records = source.calculations(ticket.point_id())?;
        self.apply_calculations(ticket, records);
        Ok(())
    }

    pub fn calculations(&self) -> &[Calculation] {
        &self.calculations
    }

    pub fn filter(&self) -> FilterCriteria {
        self.filter
    }

    /// Sets the distance limit and derives the hour limit from it. `None`
    /// clears both.
    pub fn set_max_distance(&mut self, miles: Option<f64>) -> Result<()> {
        let next = FilterCriteria {
            max_distance_miles: miles,
            max_hours: miles.map(miles_to_hours),
        };
        next.validate()?;
        self.filter = next;
        Ok(())
    }

    /// Sets the hour limit and derives the distance limit from it. `None`
    /// clears both.
    pub fn set_max_hours(&mut self, hours: Option<f64>) -> Result<()> {
        let next = FilterCriteria {
            max_distance_miles: hours.map(hours_to_miles),
            max_hours: hours,
        };
        next.validate()?;
        self.filter = next;
        Ok(())
    }

    /// Installs both limits as given, without syncing one from the other.
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> Result<()> {
        criteria.validate()?;
        self.filter = criteria;
        Ok(())
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    /// Header-click behaviour: the same field flips direction, a new field
    /// starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        self.sort = if self.sort.field == field {
            SortSpec::new(field, self.sort.direction.toggled())
        } else {
            SortSpec::new(field, SortDirection::Asc)
        };
    }

    pub fn view(&self) -> AnalysisView {
        let records = pipeline::process(&self.calculations, &self.filter, &self.sort);
        let summary = summary::summarize(&records);
        let within_ten_miles = summary::within_threshold(&records, NEARBY_THRESHOLD_MILES);
        AnalysisView {
            point: self.selected_point().cloned(),
            filter: self.filter,
            sort: self.sort,
            records,
            summary,
            within_ten_miles,
        }
    }

    /// Export request for the selected point with the active filter.
    pub fn export_request(&self, format: ExportFormat, group_by_bird_rep: bool) -> Result<ExportRequest> {
        let point_id = self
            .selected
            .ok_or_else(|| Error::Validation("select an analysis point before exporting".to_string()))?;
        Ok(ExportRequest::new(point_id, format, self.filter).grouped_by_bird_rep(group_by_bird_rep))
    }
}

/// Geocodes `query` into a draft for a new analysis point.
pub fn draft_from_address(geocoder: &dyn Geocoder, label: &str, query: &str) -> Result<PointDraft> {
    let coordinate = geocoder.geocode(query)?;
    let label = if label.trim().is_empty() {
        query.trim()
    } else {
        label.trim()
    };
    Ok(PointDraft::at(label, coordinate))
}
