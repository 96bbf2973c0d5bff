use std::path::{Path, PathBuf};

use fc_app::*;
use fc_core::{MassUnit, Nuclide};
use fc_results::{AgentLookup, FluxDirection, ResultStore, ResultsError};
use fc_series::{AggregationMode, SeriesError};
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE info (initialyear INTEGER, initialmonth INTEGER, duration INTEGER);
CREATE TABLE agententry (agentid INTEGER, kind TEXT, spec TEXT, prototype TEXT,
                         parentid INTEGER, lifetime INTEGER, entertime INTEGER);
CREATE TABLE transactions (time INTEGER, senderid INTEGER, receiverid INTEGER, resourceid INTEGER);
CREATE TABLE resources (resourceid INTEGER, quantity REAL, qualid INTEGER);
CREATE TABLE compositions (qualid INTEGER, nucid INTEGER, massfrac REAL);
CREATE TABLE timeseriesenrichmentfeed (time INTEGER, value REAL);
CREATE TABLE timeseriesenrichmentswu (time INTEGER, agentid INTEGER, value REAL);
CREATE TABLE timeseriespower (time INTEGER, agentid INTEGER, value REAL);
";

const DATA: &str = "
INSERT INTO info VALUES (2000, 1, 6);
INSERT INTO agententry VALUES
    (9, 'Region', ':agents:NullRegion', 'world', -1, -1, 0),
    (10, 'Facility', ':cycamore:Source', 'mine', 9, -1, 0),
    (11, 'Facility', ':cycamore:Enrichment', 'enrichment', 9, -1, 0),
    (12, 'Facility', ':cycamore:Reactor', 'LWR', 9, 480, 0),
    (13, 'Facility', ':cycamore:Reactor', 'LWR', 9, 480, 2),
    (14, 'Facility', ':cycamore:Sink', 'repo', 9, -1, 0);

INSERT INTO compositions VALUES (1, 922350000, 1.0), (2, 942390000, 1.0);

INSERT INTO resources VALUES
    (100, 10.0, 1), (101, 20.0, 1), (102, 5.0, 2), (103, 1000.0, 1);

INSERT INTO transactions VALUES
    (1, 12, 14, 100), (3, 13, 14, 101), (3, 12, 14, 102), (2, 11, 12, 103);

INSERT INTO timeseriesenrichmentfeed VALUES (1, 3000.0), (1, 1000.0), (3, 2000.0);
INSERT INTO timeseriesenrichmentswu VALUES (1, 11, 120.0), (3, 11, 1e30);
INSERT INTO timeseriespower VALUES (1, 12, 1000.0), (2, 12, 1000.0), (3, 13, 900.0);
";

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("{prefix}_{}_{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn build_db(dir: &Path, extra: &str) -> ResultStore {
    let path = dir.join("out.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(DATA).unwrap();
        conn.execute_batch(extra).unwrap();
    }
    ResultStore::open(&path).unwrap()
}

fn request(name: &str, mode: AggregationMode, unit: MassUnit) -> FluxRequest {
    FluxRequest {
        lookup: AgentLookup::Prototype(name.to_string()),
        direction: FluxDirection::Incoming,
        mode,
        unit,
    }
}

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{actual:?} != {expected:?}");
    }
}

const U235: Nuclide = Nuclide::from_raw(922350000);
const PU239: Nuclide = Nuclide::from_raw(942390000);

fn cumulative() -> AggregationMode {
    AggregationMode {
        cumulative: true,
        total: false,
    }
}

fn total(is_cumulative: bool) -> AggregationMode {
    AggregationMode {
        cumulative: is_cumulative,
        total: true,
    }
}

#[test]
fn flux_in_all_four_modes() {
    let dir = unique_temp_dir("fc_app_flux_modes");
    let store = build_db(&dir, "");

    let per_step =
        flux_series(&store, &request("repo", AggregationMode::PER_STEP, MassUnit::Kilogram))
            .unwrap();
    let map = per_step.as_per_key().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map[&U235], vec![0.0, 10.0, 0.0, 20.0, 0.0, 0.0]);
    assert_eq!(map[&PU239], vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0]);

    let cum = flux_series(&store, &request("repo", cumulative(), MassUnit::Kilogram)).unwrap();
    let map = cum.as_per_key().unwrap();
    assert_eq!(map[&U235], vec![0.0, 10.0, 10.0, 30.0, 30.0, 30.0]);
    assert_eq!(map[&PU239], vec![0.0, 0.0, 0.0, 5.0, 5.0, 5.0]);

    let tot = flux_series(&store, &request("repo", total(false), MassUnit::Kilogram)).unwrap();
    assert_eq!(tot.as_total().unwrap(), &vec![0.0, 10.0, 0.0, 25.0, 0.0, 0.0]);

    let tot_cum = flux_series(&store, &request("repo", total(true), MassUnit::Kilogram)).unwrap();
    assert_eq!(tot_cum.as_total().unwrap(), &vec![0.0, 10.0, 10.0, 35.0, 35.0, 35.0]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn flux_in_tonnes_is_scaled_once() {
    let dir = unique_temp_dir("fc_app_flux_tonnes");
    let store = build_db(&dir, "");
    let out = flux_series(&store, &request("REPO", cumulative(), MassUnit::Tonne)).unwrap();
    let u235 = &out.as_per_key().unwrap()[&U235];
    assert!((u235[5] - 0.03).abs() < 1e-12);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unknown_facility_is_invalid_query() {
    let dir = unique_temp_dir("fc_app_flux_unknown");
    let store = build_db(&dir, "");
    let err = flux_series(&store, &request("nowhere", AggregationMode::PER_STEP, MassUnit::Kilogram))
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Results(ResultsError::InvalidQuery { .. })
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn late_transfer_is_out_of_range() {
    let dir = unique_temp_dir("fc_app_flux_late");
    let store = build_db(
        &dir,
        "INSERT INTO resources VALUES (200, 1.0, 1);
         INSERT INTO transactions VALUES (6, 12, 14, 200);",
    );
    let err = flux_series(&store, &request("repo", AggregationMode::PER_STEP, MassUnit::Kilogram))
        .unwrap_err();
    match err {
        AppError::Series(SeriesError::OutOfRangeTimestep { time, duration, key }) => {
            assert_eq!(time, 6);
            assert_eq!(duration, 6);
            assert_eq!(key.as_deref(), Some("U235"));
        }
        other => panic!("unexpected error: {other}"),
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_metadata_is_reported() {
    let dir = unique_temp_dir("fc_app_no_info");
    let store = build_db(&dir, "DELETE FROM info;");
    let err = natural_u_feed(&store, true).unwrap_err();
    assert!(matches!(
        err,
        AppError::Results(ResultsError::MissingSimulationMetadata { .. })
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn feed_fuel_and_utilization() {
    let dir = unique_temp_dir("fc_app_metrics");
    let store = build_db(&dir, "");

    let feed = natural_u_feed(&store, true).unwrap();
    assert_eq!(feed.unit, "t");
    assert_close(feed.column("natural_u").unwrap(), &[0.0, 4.0, 4.0, 6.0, 6.0, 6.0]);

    let fuel = fuel_received(&store, false).unwrap();
    assert_close(fuel.column("fuel").unwrap(), &[0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);

    let util = uranium_utilization(&store).unwrap();
    assert_eq!(util.series[0], 0.0);
    assert_eq!(util.series[1], 0.0);
    assert!((util.series[2] - 0.25).abs() < 1e-12);
    assert!((util.series[5] - 1.0 / 6.0).abs() < 1e-12);
    assert!((util.average - 0.125).abs() < 1e-12);
    assert!(util.series.iter().all(|v| v.is_finite()));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn swu_hides_sentinels_on_export() {
    let dir = unique_temp_dir("fc_app_swu");
    let store = build_db(&dir, "");

    let table = swu_by_enrichment(&store, AggregationMode::PER_STEP).unwrap();
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["Enrichment_11"]);
    assert_eq!(table.column("Enrichment_11").unwrap()[3], 1e30);

    let mut buf = Vec::new();
    write_table(&table, ExportFormat::Csv, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert!(csv.starts_with("timestep,date,Enrichment_11\n"));
    assert!(csv.contains("1,2000-02,120\n"));
    assert!(csv.contains("3,2000-04,\n"));

    // the running total keeps every point once a sentinel is summed in
    let running = swu_by_enrichment(&store, cumulative()).unwrap();
    let mut buf = Vec::new();
    write_table(&running, ExportFormat::Csv, &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert!(csv.contains("2,2000-03,120\n"));
    assert!(!csv.contains("3,2000-04,\n"));
    assert!(!csv.contains("5,2000-06,\n"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn power_per_reactor_and_total() {
    let dir = unique_temp_dir("fc_app_power");
    let store = build_db(&dir, "");

    let per_reactor = power_by_reactor(&store, AggregationMode::PER_STEP).unwrap();
    assert_eq!(
        per_reactor.keys().collect::<Vec<_>>(),
        vec!["Reactor_12", "Reactor_13"]
    );

    let summed = power_by_reactor(&store, total(false)).unwrap();
    assert_eq!(
        summed.column("Reactor_total").unwrap(),
        &vec![0.0, 1000.0, 1000.0, 900.0, 0.0, 0.0]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn flux_table_exports_to_file() {
    let dir = unique_temp_dir("fc_app_export");
    let store = build_db(&dir, "");
    let table = flux_table(&store, &request("repo", AggregationMode::PER_STEP, MassUnit::Kilogram))
        .unwrap();
    let path = dir.join("flux.json");
    write_table_to(&table, ExportFormat::Json, Some(&path)).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["unit"], "kg");
    assert_eq!(value["series"][0]["key"], "U235");
    assert_eq!(value["series"][1]["key"], "Pu239");
    assert!(value["series"][0]["values"][0].is_null());
    assert_eq!(value["series"][0]["values"][3], 20.0);

    let _ = std::fs::remove_dir_all(&dir);
}
