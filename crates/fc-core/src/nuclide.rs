//! Nuclide identifiers in the simulator's `ZZZAAASSSS` integer form.
//!
//! `922350000` is U-235, `952420001` is the first metastable state of Am-242.

use core::fmt;

use crate::{FcError, FcResult};

const ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Isotope key used to group transferred material.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nuclide(i64);

impl Nuclide {
    pub const fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Build from atomic number, mass number and isomeric state.
    pub fn new(z: u32, a: u32, state: u32) -> FcResult<Self> {
        if z == 0 || z as usize > ELEMENTS.len() || a >= 1000 || state >= 10_000 {
            return Err(FcError::InvalidArg {
                what: "nuclide z/a/state out of range",
            });
        }
        Ok(Self(
            i64::from(z) * 10_000_000 + i64::from(a) * 10_000 + i64::from(state),
        ))
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn z(self) -> u32 {
        (self.0 / 10_000_000) as u32
    }

    pub fn a(self) -> u32 {
        ((self.0 / 10_000) % 1000) as u32
    }

    pub fn state(self) -> u32 {
        (self.0 % 10_000) as u32
    }

    pub fn symbol(self) -> FcResult<&'static str> {
        let z = self.z() as usize;
        if self.0 < 0 || z == 0 || z > ELEMENTS.len() {
            return Err(FcError::InvalidNuclide { id: self.0 });
        }
        Ok(ELEMENTS[z - 1])
    }

    /// Human label such as `U235` or `Am242M`.
    pub fn name(self) -> FcResult<String> {
        let symbol = self.symbol()?;
        let mut name = format!("{}{}", symbol, self.a());
        if self.state() > 0 {
            name.push('M');
        }
        Ok(name)
    }

    /// Parse a label (`U235`, `u-235`, `Am242M`) or a raw integer id.
    pub fn parse(text: &str) -> FcResult<Self> {
        let text = text.trim();
        if let Ok(raw) = text.parse::<i64>() {
            let nuc = Self(raw);
            nuc.symbol()?;
            return Ok(nuc);
        }

        let invalid = FcError::InvalidArg {
            what: "nuclide label",
        };
        let letters: String = text.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
        let rest = text[letters.len()..].trim_start_matches('-');
        let (digits, suffix) = rest.split_at(
            rest.find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len()),
        );
        let state = match suffix {
            "" => 0,
            "m" | "M" => 1,
            _ => return Err(invalid),
        };
        let z = ELEMENTS
            .iter()
            .position(|s| s.eq_ignore_ascii_case(&letters))
            .ok_or(FcError::InvalidArg {
                what: "unknown element symbol",
            })?;
        let a: u32 = digits.parse().map_err(|_| invalid)?;
        Self::new(z as u32 + 1, a, state)
    }
}

impl fmt::Debug for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nuclide({})", self.0)
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Ok(name) => f.write_str(&name),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_common_actinides() {
        assert_eq!(Nuclide::from_raw(922350000).name().unwrap(), "U235");
        assert_eq!(Nuclide::from_raw(942390000).name().unwrap(), "Pu239");
        assert_eq!(Nuclide::from_raw(952420001).name().unwrap(), "Am242M");
        assert_eq!(Nuclide::from_raw(10010000).name().unwrap(), "H1");
    }

    #[test]
    fn parses_labels_and_raw_ids() {
        assert_eq!(Nuclide::parse("U235").unwrap().raw(), 922350000);
        assert_eq!(Nuclide::parse("u-238").unwrap().raw(), 922380000);
        assert_eq!(Nuclide::parse("Am242m").unwrap().raw(), 952420001);
        assert_eq!(Nuclide::parse("942390000").unwrap().raw(), 942390000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Nuclide::parse("Xx12").is_err());
        assert!(Nuclide::parse("U").is_err());
        assert!(Nuclide::parse("U235q").is_err());
        assert!(Nuclide::from_raw(0).name().is_err());
    }

    #[test]
    fn display_falls_back_to_raw_id() {
        assert_eq!(Nuclide::from_raw(922350000).to_string(), "U235");
        assert_eq!(Nuclide::from_raw(5).to_string(), "5");
    }

    #[test]
    fn orders_by_raw_id() {
        let u235 = Nuclide::from_raw(922350000);
        let pu239 = Nuclide::from_raw(942390000);
        assert!(u235 < pu239);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn label_parses_back_to_same_id(z in 1u32..=118, a in 1u32..300, state in 0u32..=1) {
            let nuc = Nuclide::new(z, a, state).unwrap();
            let label = nuc.name().unwrap();
            prop_assert_eq!(Nuclide::parse(&label).unwrap(), nuc);
        }
    }
}
