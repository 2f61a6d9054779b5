// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod availability;
pub mod backend;
pub mod config;
pub mod export;
pub mod filter;
pub mod geo;
pub mod geocode;
pub mod markers;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod session;
pub mod sort;
pub mod summary;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Geocoding returned no match, or the backend has no such record.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Export failed with HTTP status {status}")]
    ExportFailure { status: u16 },
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-user configuration directory. Falls back to the working directory when
/// the platform reports no home.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "storm-coord", "Storm Coord")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
