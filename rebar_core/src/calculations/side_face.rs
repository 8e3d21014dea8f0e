//! # Side-Face Reinforcement
//!
//! Beams deeper than the torsion threshold carry their longitudinal torsion
//! steel as skin bars on both side faces. The bars fill the clear height
//! between the top and bottom cages:
//!
//! ```text
//! clear = depth - 2 × cover - 2 × max stirrup dia
//!         - max top dia (layer 1) - max top dia (layer 2)
//!         - max bottom dia (layer 1) - max bottom dia (layer 2)
//! ```
//!
//! Each section needs `flex_torsion - residual`, where the residual is the
//! over-provision already present in the top and bottom bars. The first
//! diameter (ascending) and spacing (widest first) with
//! `floor(clear / s) × 2 × A(d) > target` wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::bar_area_mm2;
use crate::errors::{CalcError, CalcResult};
use crate::outcome::{Outcome, Overstress, PerSection};
use crate::profile::DesignCodeProfile;
use crate::search::first_fit2;

/// Stage name used in catalog-exhaustion errors
pub const STAGE: &str = "side-face";

/// Skin bars on each side face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideFaceBars {
    pub dia_mm: u32,
    pub spacing_mm: u32,
    /// Provided over both faces (mm²)
    pub area_mm2: f64,
}

impl fmt::Display for SideFaceBars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}@{} EF", self.dia_mm, self.spacing_mm)
    }
}

/// Cage dimensions that bound the skin-bar height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CageDiameters {
    pub max_stirrup_mm: u32,
    pub max_top_first_mm: u32,
    pub max_top_second_mm: u32,
    pub max_bottom_first_mm: u32,
    pub max_bottom_second_mm: u32,
}

pub fn clear_space_mm(depth_mm: u32, cover_mm: u32, cage: &CageDiameters) -> f64 {
    depth_mm as f64
        - 2.0 * cover_mm as f64
        - 2.0 * cage.max_stirrup_mm as f64
        - cage.max_top_first_mm as f64
        - cage.max_top_second_mm as f64
        - cage.max_bottom_first_mm as f64
        - cage.max_bottom_second_mm as f64
}

/// Area of skin bars at `spacing_mm` over a clear height, both faces (mm²)
pub fn provided_area_mm2(clear_space_mm: f64, dia_mm: u32, spacing_mm: u32) -> f64 {
    let bars_per_face = (clear_space_mm / spacing_mm as f64).floor().max(0.0);
    bars_per_face * 2.0 * bar_area_mm2(dia_mm)
}

/// First skin-bar arrangement whose area exceeds `target_mm2`
pub fn select_bars(target_mm2: f64, clear_space_mm: f64, profile: &DesignCodeProfile) -> Option<SideFaceBars> {
    first_fit2(&profile.side_face_diameters_mm, &profile.side_face_spacings_mm, |d, s| {
        provided_area_mm2(clear_space_mm, d, s) > target_mm2
    })
    .map(|(dia_mm, spacing_mm)| SideFaceBars {
        dia_mm,
        spacing_mm,
        area_mm2: provided_area_mm2(clear_space_mm, dia_mm, spacing_mm),
    })
}

/// Inputs to the side-face stage for one beam.
#[derive(Debug, Clone, Copy)]
pub struct SideFaceInput<'a> {
    pub depth_mm: u32,
    pub flex_torsion_mm2: &'a PerSection<f64>,
    /// Flexural over-provision, `None` if any flexural section is unresolved
    pub residual_mm2: Option<&'a PerSection<f64>>,
    /// Any of the four overstress flags set
    pub any_overstress: bool,
    pub clear_space_mm: f64,
}

/// Skin bars at each section.
///
/// Shallow beams are [`Outcome::NotNeeded`]; beams with an overstress or an
/// undefined residual are [`Overstress::SideFace`].
pub fn calculate(input: &SideFaceInput<'_>, profile: &DesignCodeProfile) -> CalcResult<PerSection<Outcome<SideFaceBars>>> {
    if profile.redistributes_torsion(input.depth_mm) {
        return Ok(PerSection::splat(Outcome::NotNeeded));
    }

    let residual = match input.residual_mm2 {
        Some(residual) if !input.any_overstress => residual,
        _ => {
            warn!(depth_mm = input.depth_mm, "side-face sizing blocked by overstress or unresolved flexure");
            return Ok(PerSection::splat(Outcome::Overstressed(Overstress::SideFace)));
        }
    };

    PerSection::try_from_fn(|section| {
        let target = input.flex_torsion_mm2.get(section) - residual.get(section);
        let bars = select_bars(target, input.clear_space_mm, profile)
            .ok_or_else(|| CalcError::catalog_exhausted(STAGE, section.label(), target))?;
        debug!(%section, target, clear_space_mm = input.clear_space_mm, callout = %bars, "selected side-face bars");
        Ok(Outcome::Value(bars))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_cage() -> CageDiameters {
        CageDiameters {
            max_stirrup_mm: 12,
            max_top_first_mm: 32,
            max_top_second_mm: 0,
            max_bottom_first_mm: 25,
            max_bottom_second_mm: 0,
        }
    }

    #[test]
    fn test_clear_space() {
        assert!((clear_space_mm(800, 40, &scenario_cage()) - 639.0).abs() < 1e-9);
    }

    #[test]
    fn test_callout_format() {
        let bars = SideFaceBars {
            dia_mm: 12,
            spacing_mm: 200,
            area_mm2: 678.58,
        };
        assert_eq!(bars.to_string(), "T12@200 EF");
    }

    #[test]
    fn test_deep_beam_selection() {
        let profile = DesignCodeProfile::aci_318_19();
        let flex_torsion = PerSection::splat(1814.0);
        let residual = PerSection::new(1235.36, 880.24, 455.36);
        let input = SideFaceInput {
            depth_mm: 800,
            flex_torsion_mm2: &flex_torsion,
            residual_mm2: Some(&residual),
            any_overstress: false,
            clear_space_mm: 639.0,
        };
        let bars = calculate(&input, &profile).unwrap();
        assert_eq!(bars.left.to_string(), "T12@200 EF");
        assert_eq!(bars.middle.to_string(), "T16@200 EF");
        assert_eq!(bars.right.to_string(), "T16@150 EF");
        assert!((bars.left.value().unwrap().area_mm2 - 678.58).abs() < 0.01);
        assert!((bars.middle.value().unwrap().area_mm2 - 1206.37).abs() < 0.01);
        assert!((bars.right.value().unwrap().area_mm2 - 1608.50).abs() < 0.01);
    }

    #[test]
    fn test_shallow_beam_not_needed() {
        let profile = DesignCodeProfile::aci_318_19();
        let flex_torsion = PerSection::splat(5000.0);
        let input = SideFaceInput {
            depth_mm: 700,
            flex_torsion_mm2: &flex_torsion,
            residual_mm2: None,
            any_overstress: true,
            clear_space_mm: 500.0,
        };
        let bars = calculate(&input, &profile).unwrap();
        for (_, outcome) in bars.iter() {
            assert_eq!(outcome.to_string(), "Not needed");
        }
    }

    #[test]
    fn test_overstress_blocks_sizing() {
        let profile = DesignCodeProfile::aci_318_19();
        let flex_torsion = PerSection::splat(100.0);
        let residual = PerSection::splat(0.0);
        let input = SideFaceInput {
            depth_mm: 900,
            flex_torsion_mm2: &flex_torsion,
            residual_mm2: Some(&residual),
            any_overstress: true,
            clear_space_mm: 700.0,
        };
        let bars = calculate(&input, &profile).unwrap();
        assert_eq!(bars.middle.to_string(), "Overstressed. Please reassess");

        let input = SideFaceInput {
            any_overstress: false,
            residual_mm2: None,
            ..input
        };
        assert_eq!(calculate(&input, &profile).unwrap().left, Outcome::Overstressed(Overstress::SideFace));
    }

    #[test]
    fn test_negative_target_takes_first_entry() {
        // Residual exceeds the torsion demand
        let bars = select_bars(-200.0, 639.0, &DesignCodeProfile::aci_318_19()).unwrap();
        assert_eq!(bars.to_string(), "T12@250 EF");
    }

    #[test]
    fn test_exhausted_catalog_is_error() {
        let profile = DesignCodeProfile::aci_318_19();
        let flex_torsion = PerSection::splat(50_000.0);
        let residual = PerSection::splat(0.0);
        let input = SideFaceInput {
            depth_mm: 900,
            flex_torsion_mm2: &flex_torsion,
            residual_mm2: Some(&residual),
            any_overstress: false,
            clear_space_mm: 700.0,
        };
        assert_eq!(calculate(&input, &profile).unwrap_err().error_code(), "CATALOG_EXHAUSTED");
    }
}
