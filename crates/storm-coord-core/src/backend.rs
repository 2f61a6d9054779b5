// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::export::{ExportRequest, ExportedFile};
use crate::model::{AnalysisPoint, Calculation, Contractor, PointDraft};
use crate::{Error, Result};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// JSON-over-HTTP client for the coordination backend.
pub struct BackendClient {
    client: Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends path segments to the base URL, keeping any path prefix the
    /// base already has (e.g. `/api`).
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        endpoint(&self.base, segments)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?;
        let response = check_status(response, what)?;
        Ok(response.json()?)
    }

    pub fn analysis_points(&self) -> Result<Vec<AnalysisPoint>> {
        let url = self.endpoint(&["analysis-points"])?;
        self.get_json(url, "analysis points")
    }

    pub fn create_analysis_point(&self, draft: &PointDraft) -> Result<AnalysisPoint> {
        let url = self.endpoint(&["analysis-points"])?;
        info!(
            "Creating analysis point — label={} lat={} lon={}",
            draft.label, draft.latitude, draft.longitude
        );
        let response = self.client.post(url).json(draft).send()?;
        let response = check_status(response, "analysis point")?;
        Ok(response.json()?)
    }

    pub fn delete_analysis_point(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&["analysis-points", &id.to_string()])?;
        info!("Deleting analysis point — id={}", id);
        let response = self.client.delete(url).send()?;
        check_status(response, &format!("analysis point {}", id))?;
        Ok(())
    }

    pub fn calculations(&self, point_id: i64) -> Result<Vec<Calculation>> {
        let url = self.endpoint(&["analysis-points", &point_id.to_string(), "calculations"])?;
        let records: Vec<Calculation> =
            self.get_json(url, &format!("calculations for point {}", point_id))?;
        debug!(
            "Fetched calculations — point_id={} count={}",
            point_id,
            records.len()
        );
        Ok(records)
    }

    pub fn contractors(&self) -> Result<Vec<Contractor>> {
        let url = self.endpoint(&["contractors"])?;
        self.get_json(url, "contractors")
    }

    /// Asks the backend to render an export and returns the payload.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportedFile> {
        let url = request.url(&self.base)?;
        info!(
            "Requesting export — point_id={} format={}",
            request.point_id,
            request.format.as_param()
        );
        let response = self.client.get(url).send()?;
        export_status(response.status())?;
        let disposition = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes()?.to_vec();
        debug!("Export received — bytes={}", bytes.len());
        Ok(ExportedFile::new(request, disposition.as_deref(), bytes))
    }
}

pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| Error::Validation(format!("'{}' cannot be used as a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn check_status(response: Response, what: &str) -> Result<Response> {
    match status_error(response.status(), what) {
        Some(e) => Err(e),
        None => Ok(response),
    }
}

/// 404 means the thing asked for is gone; any other non-2xx is a backend fault.
fn status_error(status: StatusCode, what: &str) -> Option<Error> {
    if status == StatusCode::NOT_FOUND {
        Some(Error::NotFound(what.to_string()))
    } else if !status.is_success() {
        Some(Error::Service(format!(
            "backend responded with HTTP {} for {}",
            status.as_u16(),
            what
        )))
    } else {
        None
    }
}

fn export_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::ExportFailure {
            status: status.as_u16(),
        })
    }
}
