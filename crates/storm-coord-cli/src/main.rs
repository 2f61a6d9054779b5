// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::fs;
use std::path::PathBuf;
use storm_coord_core::backend::BackendClient;
use storm_coord_core::config::{Config, ConfigManager};
use storm_coord_core::export::ExportFormat;
use storm_coord_core::geo::Coordinate;
use storm_coord_core::geocode::{Geocoder, NominatimGeocoder};
use storm_coord_core::markers::overlay;
use storm_coord_core::model::{Contractor, PointDraft};
use storm_coord_core::session::{draft_from_address, AnalysisSession};
use storm_coord_core::sort::{SortDirection, SortField, SortSpec};
use storm_coord_core::{availability, report};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(short, long, env = "STORM_COORD_BACKEND", global = true)]
    backend: Option<String>,

    /// Path to config.json
    #[arg(long, env = "STORM_COORD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Filters {
    /// Keep resources within this many miles
    #[arg(long, conflicts_with = "max_hours")]
    max_distance: Option<f64>,
    /// Keep resources within this many hours of driving at 55 mph
    #[arg(long)]
    max_hours: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage analysis points
    Points {
        #[command(subcommand)]
        action: PointAction,
    },
    /// Look up the coordinate for an address or zip code
    Geocode { query: String },
    /// Rank resources around an analysis point
    Analyze {
        point_id: i64,
        #[command(flatten)]
        filters: Filters,
        /// Sort field, e.g. distance, company, crewCount, birdRep
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Print the full view as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        /// Write the table as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print map markers as JSON
        #[arg(long, conflicts_with_all = ["json", "csv"])]
        map: bool,
    },
    /// Distances from a contractor list to one or more destinations
    Availability {
        /// Contractor list as JSON; fetched from the backend when omitted
        #[arg(long)]
        contractors: Option<PathBuf>,
        /// Destination as "lat,lon" or an address/zip (repeatable)
        #[arg(long = "dest", required = true, allow_hyphen_values = true)]
        destinations: Vec<String>,
        #[command(flatten)]
        filters: Filters,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
    },
    /// Download a server-rendered export for an analysis point
    Export {
        point_id: i64,
        /// csv, excel, json, webeoc or zip
        #[arg(long, default_value = "csv")]
        format: String,
        #[command(flatten)]
        filters: Filters,
        /// Group rows by bird rep
        #[arg(long)]
        group_by_bird_rep: bool,
        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Show the effective configuration
    Config {
        /// Only print the config file location
        #[arg(long)]
        path: bool,
    },
}

#[derive(Subcommand)]
enum PointAction {
    /// List all analysis points
    List,
    /// Add a point at a coordinate
    Add {
        label: String,
        /// "lat,lon", e.g. -33.87,151.21
        #[arg(allow_hyphen_values = true)]
        coordinate: String,
    },
    /// Add a point by geocoding an address or zip code
    AddAddress {
        query: String,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Delete a point by id
    Delete { id: i64 },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("storm_coord")
        .build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Logging disabled: {}", e);
    }
}

fn sort_spec(default: SortSpec, field: Option<&str>, desc: bool) -> Result<SortSpec> {
    let field = match field {
        Some(name) => name.parse::<SortField>()?,
        None => default.field,
    };
    let direction = if desc {
        SortDirection::Desc
    } else if field == default.field {
        default.direction
    } else {
        SortDirection::Asc
    };
    Ok(SortSpec::new(field, direction))
}

fn apply_filters(session: &mut AnalysisSession, filters: &Filters) -> Result<()> {
    if let Some(miles) = filters.max_distance {
        session.set_max_distance(Some(miles))?;
    }
    if let Some(hours) = filters.max_hours {
        session.set_max_hours(Some(hours))?;
    }
    Ok(())
}

fn geocoder(config: &Config) -> Result<NominatimGeocoder> {
    Ok(NominatimGeocoder::new(
        &config.geocoder_url,
        &config.user_agent,
        config.timeout(),
    )?)
}

fn backend_client(config: &Config) -> Result<BackendClient> {
    BackendClient::new(&config.backend_url, config.timeout())
        .with_context(|| format!("Invalid backend URL '{}'", config.backend_url))
}

fn resolve_destination(input: &str, geocoder: &dyn Geocoder) -> Result<Coordinate> {
    if let Ok(c) = input.parse::<Coordinate>() {
        return Ok(c);
    }
    geocoder
        .geocode(input)
        .with_context(|| format!("Could not locate destination '{}'", input))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let manager = match &cli.config {
        Some(path) => ConfigManager::new(path.clone()),
        None => ConfigManager::default(),
    };
    let mut config = manager.load()?;
    if let Some(url) = &cli.backend {
        config.backend_url = url.clone();
    }
    log::info!(
        "Using backend — url={} config={}",
        config.backend_url,
        manager.path().display()
    );

    match &cli.command {
        Commands::Points { action } => {
            let backend = backend_client(&config)?;
            match action {
                PointAction::List => {
                    let points = backend.analysis_points()?;
                    if points.is_empty() {
                        println!("No analysis points.");
                    }
                    for p in &points {
                        println!(
                            "{:>5}  {:<32} {:>10.5} {:>11.5}",
                            p.id, p.label, p.latitude, p.longitude
                        );
                    }
                }
                PointAction::Add { label, coordinate } => {
                    let coordinate: Coordinate = coordinate.parse()?;
                    let point = backend.create_analysis_point(&PointDraft::at(label.as_str(), coordinate))?;
                    println!("Created point {} ({})", point.id, point.label);
                }
                PointAction::AddAddress { query, label } => {
                    let geocoder = geocoder(&config)?;
                    let draft = draft_from_address(&geocoder, label, query)
                        .with_context(|| format!("Could not geocode '{}'", query))?;
                    let point = backend.create_analysis_point(&draft)?;
                    println!(
                        "Created point {} ({}) at {:.5},{:.5}",
                        point.id, point.label, point.latitude, point.longitude
                    );
                }
                PointAction::Delete { id } => {
                    backend.delete_analysis_point(*id)?;
                    println!("Deleted point {}", id);
                }
            }
        }
        Commands::Geocode { query } => {
            let c = geocoder(&config)?.geocode(query)?;
            println!("{}", c);
        }
        Commands::Analyze {
            point_id,
            filters,
            sort,
            desc,
            json,
            csv,
            map,
        } => {
            let mut session = AnalysisSession::with_sort(sort_spec(
                config.default_sort,
                sort.as_deref(),
                *desc,
            )?);
            let backend = backend_client(&config)?;
            session.set_points(backend.analysis_points()?);
            apply_filters(&mut session, filters)?;
            session.load(*point_id, &backend)?;
            let view = session.view();

            if *json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else if *map {
                let o = overlay(view.point.as_ref(), &view.records, &view.filter);
                println!("{}", serde_json::to_string_pretty(&o)?);
            } else if let Some(path) = csv {
                let file = fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                report::write_csv(&view.records, file)?;
                println!("{}", report::format_summary(&view.summary, view.within_ten_miles));
                println!("Wrote {}", path.display());
            } else {
                if let Some(p) = &view.point {
                    println!("{} ({:.5},{:.5})", p.label, p.latitude, p.longitude);
                }
                print!("{}", report::format_table(&view.records));
                println!("{}", report::format_summary(&view.summary, view.within_ten_miles));
            }
        }
        Commands::Availability {
            contractors,
            destinations,
            filters,
            sort,
            desc,
        } => {
            let contractors: Vec<Contractor> = match contractors {
                Some(path) => {
                    let content = fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    serde_json::from_str(&content)
                        .with_context(|| format!("Failed to parse {}", path.display()))?
                }
                None => backend_client(&config)?.contractors()?,
            };
            let geocoder = geocoder(&config)?;
            let destinations = destinations
                .iter()
                .map(|d| resolve_destination(d, &geocoder))
                .collect::<Result<Vec<_>>>()?;

            let mut session = AnalysisSession::with_sort(sort_spec(
                config.default_sort,
                sort.as_deref(),
                *desc,
            )?);
            apply_filters(&mut session, filters)?;
            let records = availability::calculate(&contractors, &destinations)?;
            let view = storm_coord_core::pipeline::process(&records, &session.filter(), &session.sort());
            let summary = storm_coord_core::summary::summarize(&view);
            let nearby = storm_coord_core::summary::within_threshold(
                &view,
                storm_coord_core::summary::NEARBY_THRESHOLD_MILES,
            );
            print!("{}", report::format_table(&view));
            println!("{}", report::format_summary(&summary, nearby));
        }
        Commands::Export {
            point_id,
            format,
            filters,
            group_by_bird_rep,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let backend = backend_client(&config)?;
            let mut session = AnalysisSession::new();
            session.set_points(backend.analysis_points()?);
            apply_filters(&mut session, filters)?;
            session.select(*point_id)?;
            let request = session.export_request(format, *group_by_bird_rep)?;
            let file = backend.export(&request).context("Export failed")?;
            let path = file.save_to(output)?;
            println!("Saved {}", path.display());
        }
        Commands::Config { path } => {
            if *path {
                println!("{}", manager.path().display());
            } else {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}
