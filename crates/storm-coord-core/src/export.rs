// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::filter::FilterCriteria;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Formats the backend can render a calculation export in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
    /// CSV laid out for WebEOC board import.
    Webeoc,
    /// Archive bundling one file per bird rep.
    Zip,
}

impl ExportFormat {
    pub fn as_param(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Json => "json",
            ExportFormat::Webeoc => "webeoc",
            ExportFormat::Zip => "zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::Webeoc => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Json => "json",
            ExportFormat::Zip => "zip",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "webeoc" => Ok(ExportFormat::Webeoc),
            "zip" => Ok(ExportFormat::Zip),
            other => Err(Error::Validation(format!("unknown export format '{}'", other))),
        }
    }
}

/// Everything needed to ask the backend for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub point_id: i64,
    pub format: ExportFormat,
    pub criteria: FilterCriteria,
    pub group_by_bird_rep: bool,
}

impl ExportRequest {
    pub fn new(point_id: i64, format: ExportFormat, criteria: FilterCriteria) -> Self {
        Self {
            point_id,
            format,
            criteria,
            group_by_bird_rep: false,
        }
    }

    pub fn grouped_by_bird_rep(mut self, grouped: bool) -> Self {
        self.group_by_bird_rep = grouped;
        self
    }

    /// `GET {base}/analysis-points/{id}/calculations/export?...`. Unset limits
    /// are left out of the query string.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = crate::backend::endpoint(
            base,
            &[
                "analysis-points",
                &self.point_id.to_string(),
                "calculations",
                "export",
            ],
        )?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", self.format.as_param());
            if let Some(miles) = self.criteria.max_distance_miles {
                pairs.append_pair("maxDistance", &miles.to_string());
            }
            if let Some(hours) = self.criteria.max_hours {
                pairs.append_pair("maxTime", &hours.to_string());
            }
            if self.group_by_bird_rep {
                pairs.append_pair("groupByBirdRep", "true");
            }
        }
        Ok(url)
    }

    pub fn default_file_name(&self) -> String {
        format!(
            "analysis_{}_calculations.{}",
            self.point_id,
            self.format.extension()
        )
    }
}

/// A rendered export as received from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn new(request: &ExportRequest, content_disposition: Option<&str>, bytes: Vec<u8>) -> Self {
        let file_name = content_disposition
            .and_then(file_name_from_disposition)
            .unwrap_or_else(|| request.default_file_name());
        Self { file_name, bytes }
    }

    /// Writes the payload into `dir`, creating it if needed.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        log::info!(
            "Export saved — path={} bytes={}",
            path.display(),
            self.bytes.len()
        );
        Ok(path)
    }
}

/// Pulls `filename` out of a `Content-Disposition` header. Directory parts are
/// stripped so a hostile header cannot write outside the target directory.
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("filename") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })?;
    let name = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:3001/api").unwrap()
    }

    #[test]
    fn test_url_with_all_parameters() {
        let req = ExportRequest::new(9, ExportFormat::Excel, FilterCriteria::from_distance(27.5))
            .grouped_by_bird_rep(true);
        let url = req.url(&base()).unwrap();
        assert_eq!(url.path(), "/api/analysis-points/9/calculations/export");
        assert_eq!(
            url.query(),
            Some("format=excel&maxDistance=27.5&maxTime=0.5&groupByBirdRep=true")
        );
    }

    #[test]
    fn test_url_without_filters_is_still_valid() {
        let req = ExportRequest::new(3, ExportFormat::Csv, FilterCriteria::default());
        let url = req.url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/analysis-points/3/calculations/export?format=csv"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("WebEOC".parse::<ExportFormat>().unwrap(), ExportFormat::Webeoc);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_disposition_parsing() {
        assert_eq!(
            file_name_from_disposition(r#"attachment; filename="storm_roster.xlsx""#),
            Some("storm_roster.xlsx".to_string())
        );
        assert_eq!(
            file_name_from_disposition("attachment; FILENAME=report.csv"),
            Some("report.csv".to_string())
        );
        assert_eq!(
            file_name_from_disposition(r#"attachment; filename="../../etc/passwd""#),
            Some("passwd".to_string())
        );
        assert_eq!(file_name_from_disposition("attachment"), None);
        assert_eq!(file_name_from_disposition(r#"attachment; filename="..""#), None);
    }

    #[test]
    fn test_file_name_fallback_and_save() {
        let req = ExportRequest::new(12, ExportFormat::Webeoc, FilterCriteria::default());
        let file = ExportedFile::new(&req, None, b"a,b\n1,2\n".to_vec());
        assert_eq!(file.file_name, "analysis_12_calculations.csv");

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let path = file.save_to(&out).unwrap();
        assert_eq!(path, out.join("analysis_12_calculations.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"a,b\n1,2\n");
    }
}
