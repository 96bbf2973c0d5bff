//! Reactor types and their core loading specifications.

use core::fmt;

/// Reactor technology named in a fleet listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactorType {
    Pwr,
    Bwr,
    Phwr,
    Candu,
    Ap1000,
    Epr,
    /// Anything without a registered specification.
    Other(String),
}

impl ReactorType {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_uppercase().as_str() {
            "PWR" => ReactorType::Pwr,
            "BWR" => ReactorType::Bwr,
            "PHWR" => ReactorType::Phwr,
            "CANDU" => ReactorType::Candu,
            "AP1000" => ReactorType::Ap1000,
            "EPR" => ReactorType::Epr,
            _ => ReactorType::Other(text.trim().to_string()),
        }
    }

    pub fn spec(&self) -> Option<ReactorSpec> {
        let spec = match self {
            ReactorType::Pwr => ReactorSpec {
                kg_per_assembly: 446.0,
                assemblies_per_core: 193.0,
                assemblies_per_batch: 193.0 / 3.0,
                reference_mwe: 1000.0,
            },
            ReactorType::Bwr => ReactorSpec {
                kg_per_assembly: 180.0,
                assemblies_per_core: 764.0,
                assemblies_per_batch: 764.0 / 3.0,
                reference_mwe: 1000.0,
            },
            ReactorType::Phwr | ReactorType::Candu => ReactorSpec {
                kg_per_assembly: 8000.0 / 473.0,
                assemblies_per_core: 473.0,
                assemblies_per_batch: 60.0,
                reference_mwe: 500.0,
            },
            ReactorType::Ap1000 => ReactorSpec {
                kg_per_assembly: 446.0,
                assemblies_per_core: 157.0,
                assemblies_per_batch: 52.0,
                reference_mwe: 1117.0,
            },
            ReactorType::Epr => ReactorSpec {
                kg_per_assembly: 467.0,
                assemblies_per_core: 216.0,
                assemblies_per_batch: 72.0,
                reference_mwe: 1650.0,
            },
            ReactorType::Other(_) => return None,
        };
        Some(spec)
    }

    /// Registered spec, or [`ReactorSpec::DEFAULT`] with a warning.
    pub fn resolve_spec(&self) -> ReactorSpec {
        match self.spec() {
            Some(spec) => spec,
            None => {
                tracing::warn!(
                    reactor_type = %self,
                    "no specification for reactor type; using default PWR values"
                );
                ReactorSpec::DEFAULT
            }
        }
    }
}

impl fmt::Display for ReactorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReactorType::Pwr => "PWR",
            ReactorType::Bwr => "BWR",
            ReactorType::Phwr => "PHWR",
            ReactorType::Candu => "CANDU",
            ReactorType::Ap1000 => "AP1000",
            ReactorType::Epr => "EPR",
            ReactorType::Other(name) => name.as_str(),
        };
        f.write_str(name)
    }
}

/// Assembly mass and core/batch loading at a reference net capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactorSpec {
    pub kg_per_assembly: f64,
    pub assemblies_per_core: f64,
    pub assemblies_per_batch: f64,
    pub reference_mwe: f64,
}

impl ReactorSpec {
    pub const DEFAULT: Self = Self {
        kg_per_assembly: 523.4,
        assemblies_per_core: 193.0,
        assemblies_per_batch: 193.0 / 3.0,
        reference_mwe: 1000.0,
    };

    pub fn core_assemblies(&self, capacity_mwe: f64) -> u32 {
        scaled_count(self.assemblies_per_core, capacity_mwe / self.reference_mwe)
    }

    pub fn batch_assemblies(&self, capacity_mwe: f64) -> u32 {
        scaled_count(self.assemblies_per_batch, capacity_mwe / self.reference_mwe)
    }
}

fn scaled_count(per_reference: f64, ratio: f64) -> u32 {
    let n = (per_reference * ratio).round();
    if n.is_finite() && n >= 1.0 {
        n as u32
    } else {
        1
    }
}
