//! Dense series tables and their CSV / JSON export.

use std::fmt::Display;
use std::io::Write;

use fc_results::SimulationInfo;
use fc_series::{Aggregated, AggregationMode, DisplayPolicy, Series};
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub key: String,
    pub values: Series,
}

/// Columns sharing one time axis of `info.duration` monthly steps.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub title: String,
    pub unit: String,
    pub mode: AggregationMode,
    pub info: SimulationInfo,
    pub columns: Vec<NamedSeries>,
    /// Applied on export; the stored values are never altered.
    pub policy: DisplayPolicy,
}

impl SeriesTable {
    pub fn new(
        title: impl Into<String>,
        unit: impl Into<String>,
        mode: AggregationMode,
        info: SimulationInfo,
    ) -> Self {
        Self {
            title: title.into(),
            unit: unit.into(),
            mode,
            info,
            columns: Vec::new(),
            policy: DisplayPolicy::for_mode(mode),
        }
    }

    /// Per-key results keep their keys; a total becomes one `total_key` column.
    pub fn from_aggregated<K: Display>(
        title: impl Into<String>,
        unit: impl Into<String>,
        mode: AggregationMode,
        info: SimulationInfo,
        aggregated: Aggregated<K>,
        total_key: &str,
    ) -> Self {
        let mut table = Self::new(title, unit, mode, info);
        match aggregated {
            Aggregated::PerKey(map) => {
                for (key, values) in map {
                    table.push(key.to_string(), values);
                }
            }
            Aggregated::Total(values) => table.push(total_key, values),
        }
        table
    }

    pub fn with_policy(mut self, policy: DisplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn push(&mut self, key: impl Into<String>, values: Series) {
        self.columns.push(NamedSeries {
            key: key.into(),
            values,
        });
    }

    pub fn column(&self, key: &str) -> Option<&Series> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| &c.values)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    fn check_lengths(&self) -> AppResult<()> {
        let expected = self.info.duration;
        for column in &self.columns {
            if column.values.len() != expected {
                return Err(fc_series::SeriesError::LengthMismatch {
                    expected,
                    found: column.values.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn date_label(&self, t: usize) -> String {
        self.info
            .date_of(t)
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_default()
    }
}

pub fn write_table<W: Write>(table: &SeriesTable, format: ExportFormat, out: &mut W) -> AppResult<()> {
    table.check_lengths()?;
    match format {
        ExportFormat::Csv => write_csv(table, out),
        ExportFormat::Json => write_json(table, out),
    }
}

fn write_csv<W: Write>(table: &SeriesTable, out: &mut W) -> AppResult<()> {
    let mut header = String::from("timestep,date");
    for key in table.keys() {
        header.push(',');
        header.push_str(&csv_field(key));
    }
    writeln!(out, "{header}")?;

    let points: Vec<Vec<Option<f64>>> = table
        .columns
        .iter()
        .map(|c| table.policy.apply(&c.values))
        .collect();

    for t in 0..table.info.duration {
        let mut line = format!("{},{}", t, table.date_label(t));
        for column in &points {
            line.push(',');
            if let Some(v) = column[t] {
                line.push_str(&v.to_string());
            }
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonTable<'a> {
    title: &'a str,
    unit: &'a str,
    mode: &'static str,
    dates: Vec<String>,
    series: Vec<JsonSeries<'a>>,
}

#[derive(Serialize)]
struct JsonSeries<'a> {
    key: &'a str,
    values: Vec<Option<f64>>,
}

fn write_json<W: Write>(table: &SeriesTable, out: &mut W) -> AppResult<()> {
    let doc = JsonTable {
        title: &table.title,
        unit: &table.unit,
        mode: table.mode.label(),
        dates: (0..table.info.duration).map(|t| table.date_label(t)).collect(),
        series: table
            .columns
            .iter()
            .map(|c| JsonSeries {
                key: &c.key,
                values: table.policy.apply(&c.values),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)?;
    Ok(())
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Write to `path` (create or truncate) when given, stdout otherwise.
pub fn write_table_to(
    table: &SeriesTable,
    format: ExportFormat,
    path: Option<&std::path::Path>,
) -> AppResult<()> {
    match path {
        Some(path) => {
            let wrap = |source: std::io::Error| AppError::OutputWrite {
                path: path.to_path_buf(),
                source,
            };
            let file = std::fs::File::create(path).map_err(wrap)?;
            let mut out = std::io::BufWriter::new(file);
            write_table(table, format, &mut out)?;
            out.flush().map_err(wrap)?;
            tracing::info!(path = %path.display(), columns = table.columns.len(), "exported table");
            Ok(())
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_table(table, format, &mut out)
        }
    }
}
