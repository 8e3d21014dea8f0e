//! # Shear/Torsion Combination and Stirrup Selection
//!
//! Shear and torsion demand are combined into one transverse requirement per
//! section, `shear + 2 × torsion` (mm²/m), then stirrups are chosen by a
//! first-fit search: diameter ascending, spacing widest first, legs fewest
//! first. A combination is accepted when
//!
//! - `(1000 / s) × A(d) × legs > total`, and
//! - `(1000 / s) × A(d) × 2 > torsion` (two legs of a closed hoop carry torsion).
//!
//! A failed shear or torsion combo marks the whole beam's transverse demand
//! with the matching sentinel and skips the search.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::calculations::shear::select_stirrups;
//!
//! let stirrups = select_stirrups(1625.28, 332.8, &[12, 16], &[250, 200, 150], &[4]).unwrap();
//! assert_eq!(stirrups.to_string(), "4L-T12@250");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{area_per_metre_mm2, bar_area_mm2};
use crate::errors::{CalcError, CalcResult};
use crate::outcome::{Outcome, Overstress, PerSection};
use crate::record::{Demands, OverstressFlags};
use crate::search::first_fit3;

/// Stage name used in catalog-exhaustion errors
pub const STAGE: &str = "stirrup";

/// One stirrup arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stirrups {
    pub legs: u32,
    pub dia_mm: u32,
    pub spacing_mm: u32,
}

impl Stirrups {
    /// Transverse steel provided (mm²/m)
    pub fn area_mm2_per_m(&self) -> f64 {
        area_per_metre_mm2(self.dia_mm, self.spacing_mm, self.legs)
    }

    /// Whether this arrangement carries the given demand
    pub fn satisfies(&self, total_mm2_per_m: f64, torsion_mm2_per_m: f64) -> bool {
        satisfies(self.dia_mm, self.spacing_mm, self.legs, total_mm2_per_m, torsion_mm2_per_m)
    }
}

impl fmt::Display for Stirrups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}L-T{}@{}", self.legs, self.dia_mm, self.spacing_mm)
    }
}

fn satisfies(dia_mm: u32, spacing_mm: u32, legs: u32, total: f64, torsion: f64) -> bool {
    let per_leg = (1000.0 / spacing_mm as f64) * bar_area_mm2(dia_mm);
    per_leg * legs as f64 > total && per_leg * 2.0 > torsion
}

/// Which overstress sentinel the transverse demand carries, if any
pub fn transverse_overstress(flags: &OverstressFlags) -> Option<Overstress> {
    match (flags.shear, flags.torsion) {
        (true, true) => Some(Overstress::ShearAndTorsion),
        (true, false) => Some(Overstress::Shear),
        (false, true) => Some(Overstress::Torsion),
        (false, false) => None,
    }
}

/// `shear + 2 × torsion` per section, or the overstress sentinel
pub fn transverse_demand(demands: &Demands, flags: &OverstressFlags) -> PerSection<Outcome<f64>> {
    match transverse_overstress(flags) {
        Some(reason) => PerSection::splat(Outcome::Overstressed(reason)),
        None => PerSection::from_fn(|s| {
            Outcome::Value(demands.shear_mm2_per_m.get(s) + 2.0 * demands.torsion_mm2_per_m.get(s))
        }),
    }
}

/// First stirrup arrangement over the given catalogs, or `None`.
pub fn select_stirrups(
    total_mm2_per_m: f64,
    torsion_mm2_per_m: f64,
    diameters: &[u32],
    spacings: &[u32],
    legs: &[u32],
) -> Option<Stirrups> {
    first_fit3(diameters, spacings, legs, |d, s, n| {
        satisfies(d, s, n, total_mm2_per_m, torsion_mm2_per_m)
    })
    .map(|(dia_mm, spacing_mm, legs)| Stirrups {
        legs,
        dia_mm,
        spacing_mm,
    })
}

/// Initial stirrups at every section.
///
/// Overstressed demand yields [`Overstress::Section`]; a section no catalog
/// combination can carry is a [`CalcError::CatalogExhausted`].
pub fn select_all(
    demand: &PerSection<Outcome<f64>>,
    torsion_mm2_per_m: &PerSection<f64>,
    diameters: &[u32],
    spacings: &[u32],
    legs: &[u32],
) -> CalcResult<PerSection<Outcome<Stirrups>>> {
    PerSection::try_from_fn(|section| match demand.get(section) {
        Outcome::Value(total) => {
            let torsion = *torsion_mm2_per_m.get(section);
            let stirrups = select_stirrups(*total, torsion, diameters, spacings, legs)
                .ok_or_else(|| CalcError::catalog_exhausted(STAGE, section.label(), *total))?;
            debug!(%section, total, torsion, callout = %stirrups, "selected stirrups");
            Ok(Outcome::Value(stirrups))
        }
        other => {
            warn!(%section, demand = %other, "transverse demand overstressed, skipping stirrups");
            Ok(Outcome::Overstressed(Overstress::Section))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{STIRRUP_DIAMETERS_MM, STIRRUP_SPACINGS_MM};

    fn demands(shear: PerSection<f64>, torsion: PerSection<f64>) -> Demands {
        Demands {
            top_flex_mm2: PerSection::splat(0.0),
            bot_flex_mm2: PerSection::splat(0.0),
            flex_torsion_mm2: PerSection::splat(0.0),
            shear_mm2_per_m: shear,
            torsion_mm2_per_m: torsion,
        }
    }

    fn scenario() -> Demands {
        demands(
            PerSection::new(959.68, 403.94, 1619.48),
            PerSection::new(332.8, 260.03, 303.69),
        )
    }

    #[test]
    fn test_transverse_total() {
        let total = transverse_demand(&scenario(), &OverstressFlags::default());
        assert!((total.left.value().unwrap() - 1625.28).abs() < 1e-6);
        assert!((total.middle.value().unwrap() - 924.0).abs() < 1e-6);
        assert!((total.right.value().unwrap() - 2226.86).abs() < 1e-6);
    }

    #[test]
    fn test_transverse_overstress_sentinels() {
        let mut flags = OverstressFlags::default();
        flags.shear = true;
        assert_eq!(transverse_demand(&scenario(), &flags).left.to_string(), "O/S in Shear");
        flags.torsion = true;
        assert_eq!(
            transverse_demand(&scenario(), &flags).middle.to_string(),
            "O/S in Shear and Torsion"
        );
        flags.shear = false;
        assert_eq!(transverse_demand(&scenario(), &flags).right.to_string(), "O/S in Torsion");
    }

    #[test]
    fn test_four_leg_selection() {
        let d = scenario();
        let total = transverse_demand(&d, &OverstressFlags::default());
        let stirrups = select_all(&total, &d.torsion_mm2_per_m, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[4]).unwrap();
        assert_eq!(stirrups.left.to_string(), "4L-T12@250");
        assert_eq!(stirrups.middle.to_string(), "4L-T12@250");
        assert_eq!(stirrups.right.to_string(), "4L-T12@200");
        assert!((stirrups.right.value().unwrap().area_mm2_per_m() - 2261.95).abs() < 0.01);
    }

    #[test]
    fn test_spacing_tightens_before_diameter_grows() {
        // 2 legs of T12 reach 2261.9 at 100 before any T16 is tried
        let s = select_stirrups(2000.0, 0.0, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2]).unwrap();
        assert_eq!(s.to_string(), "2L-T12@100");
        let s = select_stirrups(2300.0, 0.0, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2]).unwrap();
        assert_eq!(s.to_string(), "2L-T16@150");
    }

    #[test]
    fn test_more_legs_before_tighter_spacing() {
        // At 250, 2 legs give 904.8 and 4 legs give 1809.6
        let s = select_stirrups(1000.0, 0.0, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2, 4]).unwrap();
        assert_eq!(s.to_string(), "4L-T12@250");
    }

    #[test]
    fn test_torsion_check_uses_two_legs() {
        // Total is easily met by 6 legs, but torsion needs 2 legs > 1000
        let s = select_stirrups(1200.0, 1000.0, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[6]).unwrap();
        assert!(s.satisfies(1200.0, 1000.0));
        assert_eq!(s.to_string(), "6L-T12@200");
    }

    #[test]
    fn test_selection_always_satisfies_both_checks() {
        for total in [0.0, 350.0, 900.0, 1700.0, 3100.0, 5200.0] {
            for torsion in [0.0, 200.0, 800.0] {
                let s = select_stirrups(total, torsion, &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2, 4]).unwrap();
                let per_leg = s.area_mm2_per_m() / s.legs as f64;
                assert!(s.area_mm2_per_m() > total);
                assert!(per_leg * 2.0 > torsion);
            }
        }
    }

    #[test]
    fn test_exhausted_catalog_is_an_error() {
        let total = PerSection::splat(Outcome::Value(50_000.0));
        let err = select_all(&total, &PerSection::splat(0.0), &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2]).unwrap_err();
        assert_eq!(err, CalcError::catalog_exhausted(STAGE, "left", 50_000.0));
    }

    #[test]
    fn test_overstressed_demand_skips_search() {
        let total = PerSection::splat(Outcome::Overstressed(Overstress::Torsion));
        let stirrups = select_all(&total, &PerSection::splat(0.0), &STIRRUP_DIAMETERS_MM, &STIRRUP_SPACINGS_MM, &[2]).unwrap();
        assert_eq!(stirrups.left.to_string(), "Overstressed. Please re-assess");
    }
}
