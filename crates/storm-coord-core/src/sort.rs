// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::Calculation;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Distance,
    Duration,
    Latitude,
    Longitude,
    Rating,
    CrewCount,
    LineworkerCount,
    BucketTruckCount,
    DiggerDerrickCount,
    Name,
    Company,
    Category,
    Classification,
    ContactName,
    Phone,
    Email,
    Address,
    City,
    State,
    Zip,
    Region,
    BirdRep,
    UnionStatus,
    Equipment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Distance,
            direction: SortDirection::Asc,
        }
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Stable in-place sort. Equal keys keep their incoming order.
    pub fn sort(&self, records: &mut [Calculation]) {
        let accessor = self.field.accessor();
        let direction = self.direction;
        records.sort_by(|a, b| {
            let ord = accessor.compare(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
    }
}

/// Typed view of one sortable column. Missing numbers read as `0`, missing
/// text as `""`.
#[derive(Clone, Copy)]
pub enum Accessor {
    Number(fn(&Calculation) -> Option<f64>),
    Text(fn(&Calculation) -> Option<&str>),
}

impl Accessor {
    pub fn compare(&self, a: &Calculation, b: &Calculation) -> Ordering {
        match self {
            Accessor::Number(get) => {
                let x = get(a).unwrap_or(0.0);
                let y = get(b).unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            Accessor::Text(get) => compare_text(get(a).unwrap_or(""), get(b).unwrap_or("")),
        }
    }
}

/// Case-insensitive first, so "acme" sits next to "Acme" the way a
/// locale-aware collation would place it; raw order breaks the remaining tie.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

fn count(v: Option<u32>) -> Option<f64> {
    v.map(f64::from)
}

impl SortField {
    pub const ALL: [SortField; 24] = [
        SortField::Distance,
        SortField::Duration,
        SortField::Latitude,
        SortField::Longitude,
        SortField::Rating,
        SortField::CrewCount,
        SortField::LineworkerCount,
        SortField::BucketTruckCount,
        SortField::DiggerDerrickCount,
        SortField::Name,
        SortField::Company,
        SortField::Category,
        SortField::Classification,
        SortField::ContactName,
        SortField::Phone,
        SortField::Email,
        SortField::Address,
        SortField::City,
        SortField::State,
        SortField::Zip,
        SortField::Region,
        SortField::BirdRep,
        SortField::UnionStatus,
        SortField::Equipment,
    ];

    /// Wire name, matching the backend's camelCase keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Distance => "distance",
            SortField::Duration => "duration",
            SortField::Latitude => "latitude",
            SortField::Longitude => "longitude",
            SortField::Rating => "rating",
            SortField::CrewCount => "crewCount",
            SortField::LineworkerCount => "lineworkerCount",
            SortField::BucketTruckCount => "bucketTruckCount",
            SortField::DiggerDerrickCount => "diggerDerrickCount",
            SortField::Name => "name",
            SortField::Company => "company",
            SortField::Category => "category",
            SortField::Classification => "classification",
            SortField::ContactName => "contactName",
            SortField::Phone => "phone",
            SortField::Email => "email",
            SortField::Address => "address",
            SortField::City => "city",
            SortField::State => "state",
            SortField::Zip => "zip",
            SortField::Region => "region",
            SortField::BirdRep => "birdRep",
            SortField::UnionStatus => "unionStatus",
            SortField::Equipment => "equipment",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.accessor(), Accessor::Number(_))
    }

    pub fn accessor(&self) -> Accessor {
        match self {
            SortField::Distance => Accessor::Number(|r| Some(r.distance)),
            SortField::Duration => Accessor::Number(|r| Some(r.duration as f64)),
            SortField::Latitude => Accessor::Number(|r| r.contractor.latitude),
            SortField::Longitude => Accessor::Number(|r| r.contractor.longitude),
            SortField::Rating => Accessor::Number(|r| r.contractor.rating),
            SortField::CrewCount => Accessor::Number(|r| count(r.contractor.crew_count)),
            SortField::LineworkerCount => {
                Accessor::Number(|r| count(r.contractor.lineworker_count))
            }
            SortField::BucketTruckCount => {
                Accessor::Number(|r| count(r.contractor.bucket_truck_count))
            }
            SortField::DiggerDerrickCount => {
                Accessor::Number(|r| count(r.contractor.digger_derrick_count))
            }
            SortField::Name => Accessor::Text(|r| r.contractor.name.as_deref()),
            SortField::Company => Accessor::Text(|r| r.contractor.company.as_deref()),
            SortField::Category => Accessor::Text(|r| r.contractor.category.as_deref()),
            SortField::Classification => {
                Accessor::Text(|r| r.contractor.classification.as_deref())
            }
            SortField::ContactName => Accessor::Text(|r| r.contractor.contact_name.as_deref()),
            SortField::Phone => Accessor::Text(|r| r.contractor.phone.as_deref()),
            SortField::Email => Accessor::Text(|r| r.contractor.email.as_deref()),
            SortField::Address => Accessor::Text(|r| r.contractor.address.as_deref()),
            SortField::City => Accessor::Text(|r| r.contractor.city.as_deref()),
            SortField::State => Accessor::Text(|r| r.contractor.state.as_deref()),
            SortField::Zip => Accessor::Text(|r| r.contractor.zip.as_deref()),
            SortField::Region => Accessor::Text(|r| r.contractor.region.as_deref()),
            SortField::BirdRep => Accessor::Text(|r| r.contractor.bird_rep.as_deref()),
            SortField::UnionStatus => Accessor::Text(|r| r.contractor.union_status.as_deref()),
            SortField::Equipment => Accessor::Text(|r| r.contractor.equipment.as_deref()),
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::str::FromStr for SortField {
    type Err = Error;

    /// Accepts the wire name in any case, with or without `_`/`-`
    /// separators (`birdRep`, `bird_rep`, `BIRD-REP`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize_key(s);
        SortField::ALL
            .iter()
            .copied()
            .find(|f| normalize_key(f.as_str()) == wanted)
            .ok_or_else(|| Error::Validation(format!("unknown sort field '{}'", s)))
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
