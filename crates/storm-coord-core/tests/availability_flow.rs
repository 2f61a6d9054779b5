use storm_coord_core::availability;
use storm_coord_core::export::ExportFormat;
use storm_coord_core::geo::Coordinate;
use storm_coord_core::geocode::{Geocoder, StaticGeocoder};
use storm_coord_core::markers::overlay;
use storm_coord_core::model::{AnalysisPoint, Contractor};
use storm_coord_core::report::write_csv;
use storm_coord_core::session::{draft_from_address, AnalysisSession};
use storm_coord_core::sort::SortField;
use storm_coord_core::Error;

const CONTRACTORS_JSON: &str = r#"[
    {"id": 1, "name": "Peach State Line", "company": "PSL", "city": "Macon", "state": "GA",
     "latitude": 32.8407, "longitude": -83.6324, "crewCount": 5, "birdRep": "Rivera"},
    {"id": 2, "name": "Lowcountry Power", "company": "LCP", "city": "Savannah", "state": "GA",
     "latitude": 32.0809, "longitude": -81.0912, "crewCount": 2},
    {"id": 3, "name": "Unlocated Crew", "company": "UC"},
    {"id": 4, "name": "Metro Restoration", "company": "MR", "city": "Atlanta", "state": "GA",
     "latitude": 33.7490, "longitude": -84.3880, "crewCount": 8}
]"#;

fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new()
        .with("Atlanta, GA", Coordinate::new(33.7490, -84.3880).unwrap())
        .with("31201", Coordinate::new(32.8407, -83.6324).unwrap())
}

#[test]
fn test_availability_into_session_view() {
    let contractors: Vec<Contractor> = serde_json::from_str(CONTRACTORS_JSON).unwrap();
    let g = geocoder();
    let destinations = vec![g.geocode("Atlanta, GA").unwrap()];

    let records = availability::calculate(&contractors, &destinations).unwrap();
    assert_eq!(records.len(), 3);

    let draft = draft_from_address(&g, "Atlanta staging", "Atlanta, GA").unwrap();
    let mut session = AnalysisSession::new();
    session.add_point(AnalysisPoint {
        id: 42,
        label: draft.label.clone(),
        latitude: draft.latitude,
        longitude: draft.longitude,
        created_at: None,
    });
    let ticket = session.select(42).unwrap();
    assert!(session.apply_calculations(ticket, records));

    // Macon is ~80 mi from Atlanta, Savannah ~215 mi.
    session.set_max_hours(Some(2.0)).unwrap();
    let view = session.view();
    let names: Vec<_> = view
        .records
        .iter()
        .map(|r| r.contractor.name.clone().unwrap())
        .collect();
    assert_eq!(names, ["Metro Restoration", "Peach State Line"]);
    assert_eq!(view.summary.closest, Some(0.0));
    assert_eq!(view.within_ten_miles, 1);

    session.sort_by(SortField::CrewCount);
    session.sort_by(SortField::CrewCount);
    let view = session.view();
    assert_eq!(
        view.records[0].contractor.name.as_deref(),
        Some("Metro Restoration")
    );

    let map = overlay(session.selected_point(), &view.records, &session.filter());
    assert_eq!(map.markers.len(), 2);
    assert!((map.radius_miles.unwrap() - 110.0).abs() < 1e-9);

    let mut csv_out = Vec::new();
    write_csv(&view.records, &mut csv_out).unwrap();
    assert_eq!(String::from_utf8(csv_out).unwrap().lines().count(), 3);

    let req = session.export_request(ExportFormat::Zip, true).unwrap();
    assert_eq!(req.point_id, 42);
    assert_eq!(req.criteria.max_distance_miles, Some(110.0));
}

#[test]
fn test_multiple_destinations_use_nearest() {
    let contractors: Vec<Contractor> = serde_json::from_str(CONTRACTORS_JSON).unwrap();
    let g = geocoder();
    let destinations = vec![
        g.geocode("Atlanta, GA").unwrap(),
        g.geocode("31201").unwrap(),
    ];
    let records = availability::calculate(&contractors, &destinations).unwrap();
    let macon = records
        .iter()
        .find(|r| r.contractor.id == Some(1))
        .unwrap();
    assert_eq!(macon.distance, 0.0);

    let rows = availability::matrix(&contractors, &destinations);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|(_, row)| row.len() == 2));
}

#[test]
fn test_missing_destination_is_validation_error() {
    let contractors: Vec<Contractor> = serde_json::from_str(CONTRACTORS_JSON).unwrap();
    assert!(matches!(
        availability::calculate(&contractors, &[]),
        Err(Error::Validation(_))
    ));
}
