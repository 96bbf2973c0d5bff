//! fc-core: stable foundation for the fuel-cycle analysis tools.
//!
//! Contains:
//! - units (uom mass types + kg/tonne scale factors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (typed keys for agents, quality classes and nuclides)
//! - nuclide (ZZAAAMMMM id naming)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod nuclide;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FcError, FcResult};
pub use ids::*;
pub use nuclide::Nuclide;
pub use numeric::*;
pub use units::*;
