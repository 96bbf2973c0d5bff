//! Scenario validation logic.

use std::collections::BTreeMap;

use fc_core::{Nuclide, ensure_non_negative};

use crate::dates::YearMonth;
use crate::schema::{LATEST_VERSION, ReactorDef, Scenario};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let sim = &scenario.simulation;
    if sim.duration == 0 {
        return Err(invalid(
            "simulation.duration",
            sim.duration,
            "must be at least one timestep",
        ));
    }
    if !(1..=12).contains(&sim.start_month) {
        return Err(invalid(
            "simulation.start_month",
            sim.start_month,
            "must be 1-12",
        ));
    }

    if scenario.infrastructure.region.trim().is_empty() {
        return Err(invalid("infrastructure.region", "\"\"", "must not be empty"));
    }

    for reactor in &scenario.reactors {
        validate_reactor(reactor)?;
    }

    validate_recipe("recipes.fresh", &scenario.recipes.fresh)?;
    validate_recipe("recipes.spent", &scenario.recipes.spent)?;

    let min = scenario.options.min_capacity_mwe;
    ensure_non_negative(min, "minimum capacity")
        .map_err(|e| invalid("options.min_capacity_mwe", min, &e.to_string()))?;
    if scenario.options.cycle_time_months == 0 {
        return Err(invalid("options.cycle_time_months", 0, "must be positive"));
    }

    Ok(())
}

fn validate_reactor(reactor: &ReactorDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("reactors[{}].{}", reactor.name, name);

    if reactor.name.trim().is_empty() {
        return Err(invalid("reactors.name", "\"\"", "must not be empty"));
    }
    ensure_non_negative(reactor.capacity_mwe, "net capacity")
        .map_err(|e| invalid(&field("capacity_mwe"), reactor.capacity_mwe, &e.to_string()))?;
    for (name, date) in [
        ("first_criticality", reactor.first_criticality),
        ("shutdown", reactor.shutdown),
    ] {
        if let Some(date) = date {
            YearMonth::from_yyyymmdd(date)
                .map_err(|e| invalid(&field(name), date, &e.to_string()))?;
        }
    }
    Ok(())
}

fn validate_recipe(context: &str, recipe: &BTreeMap<String, f64>) -> Result<(), ValidationError> {
    for (key, fraction) in recipe {
        Nuclide::parse(key)
            .map_err(|e| invalid(&format!("{context}.{key}"), key, &e.to_string()))?;
        ensure_non_negative(*fraction, "mass fraction")
            .map_err(|e| invalid(&format!("{context}.{key}"), fraction, &e.to_string()))?;
    }
    if !recipe.is_empty() && recipe.values().sum::<f64>() <= 0.0 {
        return Err(invalid(context, "0", "fractions sum to zero"));
    }
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn base() -> Scenario {
        Scenario {
            version: 1,
            name: "unit".to_string(),
            simulation: SimulationParameters {
                duration: 12,
                start_month: 1,
                start_year: 2000,
                decay: DecayMode::Never,
            },
            reactors: vec![ReactorDef {
                country: "France".to_string(),
                name: "Chinon".to_string(),
                reactor_type: "PWR".to_string(),
                capacity_mwe: 905.0,
                operator: "EDF".to_string(),
                first_criticality: Some(19820101),
                shutdown: None,
            }],
            infrastructure: InfrastructureDef::default(),
            recipes: RecipesDef::default(),
            options: RenderOptions::default(),
        }
    }

    #[test]
    fn base_is_valid() {
        validate_scenario(&base()).unwrap();
    }

    #[test]
    fn zero_duration_rejected() {
        let mut s = base();
        s.simulation.duration = 0;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn bad_month_rejected() {
        let mut s = base();
        s.simulation.start_month = 13;
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn future_version_rejected() {
        let mut s = base();
        s.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn bad_date_rejected() {
        let mut s = base();
        s.reactors[0].first_criticality = Some(19821301);
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn recipe_keys_must_be_nuclides() {
        let mut s = base();
        s.recipes.fresh.insert("U235".to_string(), 0.04);
        s.recipes.fresh.insert("Unobtainium".to_string(), 0.96);
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn negative_capacity_rejected() {
        let mut s = base();
        s.reactors[0].capacity_mwe = -1.0;
        let err = validate_scenario(&s).unwrap_err();
        assert!(err.to_string().contains("capacity_mwe"));
        s.reactors[0].capacity_mwe = f64::NAN;
        assert!(validate_scenario(&s).is_err());
    }
}
