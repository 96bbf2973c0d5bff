// fc-core/src/units.rs

use uom::si::f64::Mass as UomMass;

use crate::Real;

// Public canonical unit types (SI, f64)
pub type Mass = UomMass;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn tonnes(v: f64) -> Mass {
    use uom::si::mass::ton;
    Mass::new::<ton>(v)
}

/// Unit in which transferred masses are reported.
///
/// The result store records masses in kilograms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MassUnit {
    #[default]
    Kilogram,
    Tonne,
}

impl MassUnit {
    /// Multiplier converting a value stored in kilograms into this unit.
    pub fn factor_from_kg(self) -> Real {
        match self {
            MassUnit::Kilogram => 1.0,
            MassUnit::Tonne => {
                use uom::si::mass::ton;
                kg(1.0).get::<ton>()
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            MassUnit::Kilogram => "kg",
            MassUnit::Tonne => "t",
        }
    }
}
