//! Reactor fleet -> prototypes and per-country, per-operator deployments.

use std::collections::{BTreeMap, BTreeSet};

use crate::ScenarioResult;
use crate::dates::{DEFAULT_LIFETIME_MONTHS, YearMonth, entry_time, prototype_lifetime};
use crate::reactor::{ReactorSpec, ReactorType};
use crate::schema::{ReactorDef, Scenario};

/// One reactor facility definition in the simulator input.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: String,
    pub reactor_type: ReactorType,
    pub capacity_mwe: f64,
    pub spec: ReactorSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentEntry {
    pub prototype: String,
    pub build_time: u32,
    pub n_build: u32,
    pub lifetime: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstitutionPlan {
    pub name: String,
    pub entries: Vec<DeploymentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPlan {
    pub country: String,
    pub institutions: Vec<InstitutionPlan>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FleetPlan {
    pub prototypes: Vec<Prototype>,
    pub regions: Vec<RegionPlan>,
    /// Reactors dropped as test reactors.
    pub filtered: usize,
    /// Reactors already shut down when the simulation starts.
    pub retired: usize,
    /// Reactor types rendered with the default specification.
    pub fallback_types: BTreeSet<String>,
}

/// Drop a parenthesised suffix: `"Doel-1 (BE)"` -> `"Doel-1"`.
pub fn refine_name(name: &str) -> String {
    match (name.find('('), name.find(')')) {
        (Some(start), Some(_)) => name[..start].trim().to_string(),
        _ => name.trim().to_string(),
    }
}

pub fn plan_fleet(scenario: &Scenario) -> ScenarioResult<FleetPlan> {
    let sim = &scenario.simulation;
    let sim_start = YearMonth {
        year: sim.start_year,
        month: sim.start_month,
    };
    let min_capacity = scenario.options.min_capacity_mwe;

    let mut plan = FleetPlan::default();
    let mut prototypes: BTreeMap<String, Prototype> = BTreeMap::new();
    // country -> operator -> (prototype, build_time, lifetime) -> count
    let mut grouped: BTreeMap<&str, BTreeMap<&str, BTreeMap<(String, u32, u32), u32>>> =
        BTreeMap::new();

    for reactor in &scenario.reactors {
        if reactor.capacity_mwe < min_capacity {
            tracing::debug!(
                reactor = %reactor.name,
                capacity_mwe = reactor.capacity_mwe,
                "skipping test reactor"
            );
            plan.filtered += 1;
            continue;
        }

        let Some((build_time, lifetime)) = deployment_window(sim_start, reactor)? else {
            tracing::debug!(reactor = %reactor.name, "shut down before simulation start");
            plan.retired += 1;
            continue;
        };
        let prototype = register_prototype(&mut prototypes, reactor, &mut plan.fallback_types);

        *grouped
            .entry(reactor.country.as_str())
            .or_default()
            .entry(reactor.operator.as_str())
            .or_default()
            .entry((prototype, build_time, lifetime))
            .or_insert(0) += 1;
    }

    if plan.filtered > 0 {
        tracing::warn!(count = plan.filtered, min_capacity, "filtered test reactors");
    }
    if plan.retired > 0 {
        tracing::info!(count = plan.retired, "skipped reactors retired before the simulation start");
    }

    plan.prototypes = prototypes.into_values().collect();
    plan.regions = grouped
        .into_iter()
        .map(|(country, operators)| RegionPlan {
            country: country.to_string(),
            institutions: operators
                .into_iter()
                .map(|(operator, entries)| InstitutionPlan {
                    name: operator.to_string(),
                    entries: entries
                        .into_iter()
                        .map(|((prototype, build_time, lifetime), n_build)| DeploymentEntry {
                            prototype,
                            build_time,
                            n_build,
                            lifetime,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    Ok(plan)
}

/// Reuse a prototype with the same name, type and capacity; otherwise
/// register a new one. Colliding names are suffixed with the capacity, then
/// with the type, then numbered.
fn register_prototype(
    prototypes: &mut BTreeMap<String, Prototype>,
    reactor: &ReactorDef,
    fallback_types: &mut BTreeSet<String>,
) -> String {
    let reactor_type = ReactorType::parse(&reactor.reactor_type);
    let base = refine_name(&reactor.name);
    let capacity = reactor.capacity_mwe.round();

    let mut attempt = 0u32;
    loop {
        let name = match attempt {
            0 => base.clone(),
            1 => format!("{base}_{capacity}MWe"),
            2 => format!("{base}_{reactor_type}_{capacity}MWe"),
            n => format!("{base}_{reactor_type}_{capacity}MWe_{}", n - 1),
        };
        attempt += 1;

        match prototypes.get(&name) {
            Some(existing)
                if existing.reactor_type == reactor_type
                    && existing.capacity_mwe == reactor.capacity_mwe =>
            {
                return name;
            }
            Some(_) => continue,
            None => {
                if reactor_type.spec().is_none() {
                    fallback_types.insert(reactor_type.to_string());
                }
                let spec = reactor_type.resolve_spec();
                prototypes.insert(
                    name.clone(),
                    Prototype {
                        name: name.clone(),
                        reactor_type,
                        capacity_mwe: reactor.capacity_mwe,
                        spec,
                    },
                );
                return name;
            }
        }
    }
}

/// `(build_time, lifetime)` for a reactor, or `None` if it shut down before
/// the simulation starts.
///
/// Reactors already running at the start (or with no known start) are built
/// on the first timestep, with the months already operated taken off their
/// lifetime.
fn deployment_window(
    sim_start: YearMonth,
    reactor: &ReactorDef,
) -> ScenarioResult<Option<(u32, u32)>> {
    let Some(start) = reactor.first_criticality else {
        return Ok(Some((1, DEFAULT_LIFETIME_MONTHS)));
    };
    let lifetime = prototype_lifetime(start, reactor.shutdown)?;
    let entry = entry_time(sim_start, start)?;
    if entry > 0 {
        return Ok(Some((u32::try_from(entry).unwrap_or(u32::MAX), lifetime)));
    }
    let remaining = i64::from(lifetime) + entry;
    if remaining <= 0 {
        return Ok(None);
    }
    Ok(Some((1, u32::try_from(remaining).unwrap_or(u32::MAX))))
}
