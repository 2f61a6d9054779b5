// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::model::Calculation;
use crate::summary::Summary;
use crate::Result;
use std::io::Write;

const COLUMNS: [&str; 9] = [
    "name",
    "company",
    "category",
    "city",
    "state",
    "bird_rep",
    "crew_count",
    "distance_mi",
    "hours",
];

fn row(r: &Calculation) -> [String; 9] {
    let c = &r.contractor;
    [
        c.display_name(),
        c.company.clone().unwrap_or_default(),
        c.category.clone().unwrap_or_default(),
        c.city.clone().unwrap_or_default(),
        c.state.clone().unwrap_or_default(),
        c.bird_rep.clone().unwrap_or_default(),
        c.crew_count.map(|n| n.to_string()).unwrap_or_default(),
        format!("{:.1}", r.distance),
        format!("{:.2}", r.hours()),
    ]
}

/// Writes the results table as CSV, header first.
pub fn write_csv<W: Write>(records: &[Calculation], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for r in records {
        wtr.write_record(row(r))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Fixed-width table for terminals.
pub fn format_table(records: &[Calculation]) -> String {
    let mut out = format!(
        "{:<32} {:<24} {:<14} {:>6} {:>9} {:>6}\n",
        "NAME", "COMPANY", "CITY", "STATE", "MILES", "HOURS"
    );
    for r in records {
        let c = &r.contractor;
        out.push_str(&format!(
            "{:<32} {:<24} {:<14} {:>6} {:>9.1} {:>6.2}\n",
            truncate(&c.display_name(), 32),
            truncate(c.company.as_deref().unwrap_or(""), 24),
            truncate(c.city.as_deref().unwrap_or(""), 14),
            truncate(c.state.as_deref().unwrap_or(""), 6),
            r.distance,
            r.hours()
        ));
    }
    out
}

pub fn format_summary(summary: &Summary, within_ten_miles: usize) -> String {
    let fmt = |v: Option<f64>| v.map(|d| format!("{:.1} mi", d)).unwrap_or_else(|| "-".to_string());
    format!(
        "{} resources | closest {} | average {} | {} within 10 mi",
        summary.count,
        fmt(summary.closest),
        fmt(summary.average),
        within_ten_miles
    )
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
