//! Tabular reactor lists (one reactor per row, with a header line).
//!
//! Columns are positional:
//! `country, reactor_name, type, net_elec_capacity, status, operator,
//! const_date, cons_year, first_crit, entry_time, lifetime, first_grid,
//! commercial, shutdown_date, ucf`. Dates are `yyyymmdd`; a blank, zero or
//! unparsable date is treated as unknown.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde::de::IgnoredAny;

use crate::ScenarioResult;
use crate::schema::ReactorDef;

#[derive(Debug, Deserialize)]
struct ReactorRow {
    country: String,
    reactor_name: String,
    reactor_type: String,
    net_elec_capacity: f64,
    _status: IgnoredAny,
    operator: String,
    _const_date: IgnoredAny,
    _cons_year: IgnoredAny,
    #[serde(deserialize_with = "csv::invalid_option")]
    first_crit: Option<u32>,
    _entry_time: IgnoredAny,
    _lifetime: IgnoredAny,
    _first_grid: IgnoredAny,
    _commercial: IgnoredAny,
    #[serde(deserialize_with = "csv::invalid_option")]
    shutdown_date: Option<u32>,
    _ucf: IgnoredAny,
}

impl From<ReactorRow> for ReactorDef {
    fn from(row: ReactorRow) -> Self {
        ReactorDef {
            country: row.country,
            name: row.reactor_name,
            reactor_type: row.reactor_type,
            capacity_mwe: row.net_elec_capacity,
            operator: row.operator,
            first_criticality: row.first_crit.filter(|&d| d > 0),
            shutdown: row.shutdown_date.filter(|&d| d > 0),
        }
    }
}

pub fn load_reactors_csv(path: &Path) -> ScenarioResult<Vec<ReactorDef>> {
    let file = std::fs::File::open(path)?;
    let reactors = read_reactors_csv(file)?;
    tracing::debug!(path = %path.display(), reactors = reactors.len(), "loaded reactor list");
    Ok(reactors)
}

pub fn read_reactors_csv<R: Read>(source: R) -> ScenarioResult<Vec<ReactorDef>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut reactors = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Header names vary between data sources, so rows map by position.
        let row: ReactorRow = record.deserialize(None)?;
        reactors.push(row.into());
    }
    Ok(reactors)
}
