//! Result store query API.

use std::path::Path;

use fc_core::{AgentId, Nuclide, QualId, Real, Timestep};
use rusqlite::{Connection, OpenFlags, params, params_from_iter};

use crate::transactions::CompositionTable;
use crate::types::{AgentEntry, AgentLookup, FluxDirection, FluxRow, SimulationInfo};
use crate::{ResultsError, ResultsResult};

/// Read-only handle on one simulation output database.
pub struct ResultStore {
    conn: Connection,
}

impl ResultStore {
    /// Open an existing output file without write access.
    pub fn open(path: &Path) -> ResultsResult<Self> {
        if !path.exists() {
            return Err(ResultsError::StoreNotFound {
                path: path.display().to_string(),
            });
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        tracing::debug!(path = %path.display(), "opened result store");
        Ok(Self { conn })
    }

    /// Wrap an already-open connection (in-memory fixtures, shared handles).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn simulation_info(&self) -> ResultsResult<SimulationInfo> {
        let missing = |reason: String| ResultsError::MissingSimulationMetadata {
            table: "info",
            reason,
        };

        let (year, month, duration): (i64, i64, i64) = self
            .conn
            .query_row(
                "SELECT initialyear, initialmonth, duration FROM info",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(|e| missing(e.to_string()))?;

        let initial_year =
            i32::try_from(year).map_err(|_| missing(format!("initialyear {year} out of range")))?;
        let initial_month = u32::try_from(month)
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or_else(|| missing(format!("initialmonth {month} is not a month")))?;
        let duration = usize::try_from(duration)
            .map_err(|_| missing(format!("duration {duration} is negative")))?;

        Ok(SimulationInfo {
            initial_year,
            initial_month,
            duration,
        })
    }

    /// Agent registry rows, optionally restricted by `lookup`, ordered by id.
    pub fn agent_entries(&self, lookup: Option<&AgentLookup>) -> ResultsResult<Vec<AgentEntry>> {
        const COLUMNS: &str =
            "SELECT agentid, kind, spec, prototype, parentid, lifetime, entertime FROM agententry";

        let (sql, arg) = match lookup {
            None => (format!("{COLUMNS} ORDER BY agentid"), None),
            Some(lookup) => {
                let name = validated_name(lookup)?;
                match lookup {
                    AgentLookup::Prototype(_) => (
                        format!("{COLUMNS} WHERE prototype = ?1 COLLATE NOCASE ORDER BY agentid"),
                        Some(name.to_string()),
                    ),
                    AgentLookup::Archetype(_) => (
                        format!(
                            "{COLUMNS} WHERE spec LIKE ?1 ESCAPE '\\' ORDER BY agentid"
                        ),
                        Some(like_substring(name)),
                    ),
                }
            }
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<AgentEntry> {
            Ok(AgentEntry {
                agent_id: AgentId::new(row.get(0)?),
                kind: row.get(1)?,
                spec: row.get(2)?,
                prototype: row.get(3)?,
                parent_id: row
                    .get::<_, Option<i64>>(4)?
                    .filter(|id| *id >= 0)
                    .map(AgentId::new),
                lifetime: row.get::<_, Option<i64>>(5)?.filter(|l| *l >= 0),
                enter_time: row.get(6)?,
            })
        };
        let entries = match arg {
            Some(arg) => stmt
                .query_map(params![arg], map_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(entries)
    }

    /// Agent ids matching `lookup`. Empty when nothing matches.
    pub fn resolve_agent_ids(&self, lookup: &AgentLookup) -> ResultsResult<Vec<AgentId>> {
        let ids: Vec<AgentId> = self
            .agent_entries(Some(lookup))?
            .into_iter()
            .map(|entry| entry.agent_id)
            .collect();
        tracing::debug!(lookup = ?lookup, matched = ids.len(), "resolved agent ids");
        Ok(ids)
    }

    /// Transferred mass into or out of `ids`, summed per `(time, qualid)`.
    ///
    /// Fails with [`ResultsError::InvalidQuery`] before touching the database
    /// when `ids` is empty.
    pub fn query_flux(
        &self,
        ids: &[AgentId],
        direction: FluxDirection,
    ) -> ResultsResult<Vec<FluxRow>> {
        if ids.is_empty() {
            return Err(ResultsError::InvalidQuery {
                reason: "cannot build a flux query from an empty agent id list".to_string(),
            });
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT transactions.time, SUM(resources.quantity), resources.qualid \
             FROM resources INNER JOIN transactions \
             ON transactions.resourceid = resources.resourceid \
             WHERE {} IN ({}) \
             GROUP BY transactions.time, resources.qualid \
             ORDER BY transactions.time, resources.qualid",
            direction.match_column(),
            placeholders
        );
        tracing::debug!(?direction, agents = ids.len(), "querying flux");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(ids.iter().map(|id| id.get())), |row| {
                Ok(FluxRow {
                    time: row.get(0)?,
                    quantity: row.get(1)?,
                    qual_id: QualId(row.get(2)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every quality class with its `(nuclide, mass fraction)` list.
    pub fn query_compositions(&self) -> ResultsResult<CompositionTable> {
        let mut stmt = self.conn.prepare(
            "SELECT qualid, nucid, massfrac FROM compositions ORDER BY qualid, nucid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                QualId(row.get(0)?),
                Nuclide::from_raw(row.get(1)?),
                row.get::<_, Real>(2)?,
            ))
        })?;

        let mut table = CompositionTable::new();
        for row in rows {
            let (qual_id, nuclide, mass_frac) = row?;
            table.entry(qual_id).or_default().push((nuclide, mass_frac));
        }
        Ok(table)
    }

    /// Natural uranium fed to enrichment, summed over enrichers per time.
    pub fn enrichment_feed(&self) -> ResultsResult<Vec<(Timestep, Real)>> {
        self.time_values(
            "SELECT time, SUM(value) FROM timeseriesenrichmentfeed GROUP BY time ORDER BY time",
            None,
        )
    }

    /// Separative work recorded by one enrichment agent.
    pub fn enrichment_swu(&self, agent: AgentId) -> ResultsResult<Vec<(Timestep, Real)>> {
        self.time_values(
            "SELECT time, SUM(value) FROM timeseriesenrichmentswu \
             WHERE agentid = ?1 GROUP BY time ORDER BY time",
            Some(agent),
        )
    }

    /// Electric power recorded by one reactor agent.
    pub fn power(&self, agent: AgentId) -> ResultsResult<Vec<(Timestep, Real)>> {
        self.time_values(
            "SELECT time, SUM(value) FROM timeseriespower \
             WHERE agentid = ?1 GROUP BY time ORDER BY time",
            Some(agent),
        )
    }

    /// Total mass received per time by agents whose spec contains `archetype`.
    pub fn mass_received_by_archetype(
        &self,
        archetype: &str,
    ) -> ResultsResult<Vec<(Timestep, Real)>> {
        let name = validated_name(&AgentLookup::Archetype(archetype.to_string()))?.to_string();
        let mut stmt = self.conn.prepare(
            "SELECT transactions.time, SUM(resources.quantity) FROM transactions \
             INNER JOIN resources ON resources.resourceid = transactions.resourceid \
             INNER JOIN agententry ON transactions.receiverid = agententry.agentid \
             WHERE agententry.spec LIKE ?1 ESCAPE '\\' \
             GROUP BY transactions.time ORDER BY transactions.time",
        )?;
        let rows = stmt
            .query_map(params![like_substring(&name)], |row| {
                Ok((row.get::<_, Timestep>(0)?, row.get::<_, Real>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn time_values(
        &self,
        sql: &str,
        agent: Option<AgentId>,
    ) -> ResultsResult<Vec<(Timestep, Real)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let map_row =
            |row: &rusqlite::Row<'_>| -> rusqlite::Result<(Timestep, Real)> {
                Ok((row.get(0)?, row.get(1)?))
            };
        let rows = match agent {
            Some(agent) => stmt
                .query_map(params![agent.get()], map_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }
}

fn validated_name(lookup: &AgentLookup) -> ResultsResult<&str> {
    let name = lookup.name().trim();
    if name.is_empty() {
        return Err(ResultsError::InvalidQuery {
            reason: "agent search name is empty".to_string(),
        });
    }
    Ok(name)
}

/// `%name%` with LIKE wildcards in `name` escaped.
fn like_substring(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
