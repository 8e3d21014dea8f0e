//! # Stirrup Spacing Governance
//!
//! Maximum longitudinal hoop spacing near the supports (ACI 318-19 18.4.2.4)
//! and along the middle of the span, snapped down to a catalog spacing:
//!
//! ```text
//! end    = min(d/4, 8 × smallest longitudinal bar, 24 × smallest stirrup bar, 300)
//! centre = min(d/2, 250)
//! ```
//!
//! When a selected stirrup spacing exceeds its limit, that section's stirrups
//! are re-selected. Sections within their limit keep their selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::shear::{select_stirrups, Stirrups, STAGE};
use crate::catalog::snap_spacing;
use crate::errors::{CalcError, CalcResult};
use crate::outcome::{Outcome, PerSection, Section};
use crate::profile::{DesignCodeProfile, EndSpacingStrategy};
use crate::search::first_fit;

const LONG_BAR_MULTIPLIER: f64 = 8.0;
const STIRRUP_BAR_MULTIPLIER: f64 = 24.0;
const END_CAP_MM: f64 = 300.0;
const CENTRE_CAP_MM: f64 = 250.0;

/// Spacing ceilings for one beam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingLimits {
    /// Unsnapped support-region limit (mm)
    pub raw_end_mm: f64,
    /// Unsnapped midspan limit (mm)
    pub raw_centre_mm: f64,
    pub end_mm: u32,
    pub centre_mm: u32,
}

impl SpacingLimits {
    pub fn calculate(
        effective_depth_mm: f64,
        smallest_long_dia_mm: u32,
        smallest_stirrup_dia_mm: u32,
        spacings_mm: &[u32],
    ) -> Self {
        let raw_end_mm = (effective_depth_mm / 4.0)
            .min(LONG_BAR_MULTIPLIER * smallest_long_dia_mm as f64)
            .min(STIRRUP_BAR_MULTIPLIER * smallest_stirrup_dia_mm as f64)
            .min(END_CAP_MM);
        let raw_centre_mm = (effective_depth_mm / 2.0).min(CENTRE_CAP_MM);
        SpacingLimits {
            raw_end_mm,
            raw_centre_mm,
            end_mm: snap_spacing(raw_end_mm, spacings_mm),
            centre_mm: snap_spacing(raw_centre_mm, spacings_mm),
        }
    }

    /// Limit that applies at `section`
    pub fn limit_at(&self, section: Section) -> u32 {
        if section.is_end() {
            self.end_mm
        } else {
            self.centre_mm
        }
    }
}

/// Demand the re-selection must still carry at one section.
struct Demand {
    total: f64,
    torsion: f64,
}

/// Re-select stirrups whose spacing exceeds the limits.
///
/// `demand` is the combined transverse demand of each section and `torsion`
/// the torsion demand (both mm²/m); `legs` is the leg catalog of the initial
/// search. Non-value sections are left untouched.
pub fn govern(
    stirrups: &PerSection<Outcome<Stirrups>>,
    demand: &PerSection<Outcome<f64>>,
    torsion_mm2_per_m: &PerSection<f64>,
    limits: &SpacingLimits,
    legs: &[u32],
    profile: &DesignCodeProfile,
) -> CalcResult<PerSection<Outcome<Stirrups>>> {
    let demand_at = |section: Section| {
        demand.get(section).value().map(|total| Demand {
            total: *total,
            torsion: *torsion_mm2_per_m.get(section),
        })
    };
    let mut governed = *stirrups;

    match profile.end_spacing_strategy {
        EndSpacingStrategy::UniformEnds => {
            if let (Some(left), Some(right), Some(left_demand), Some(right_demand)) = (
                stirrups.left.value(),
                stirrups.right.value(),
                demand_at(Section::Left),
                demand_at(Section::Right),
            ) {
                if left.spacing_mm > limits.end_mm || right.spacing_mm > limits.end_mm {
                    let middle_legs = stirrups.middle.value().map_or(0, |m| m.legs);
                    let legs = left.legs.max(right.legs).max(middle_legs);
                    let spacing = left.spacing_mm.min(right.spacing_mm).min(limits.end_mm);
                    debug!(legs, spacing, "unifying support stirrups");
                    governed.left = Outcome::Value(at_fixed_arrangement(Section::Left, &left_demand, legs, spacing, profile)?);
                    governed.right = Outcome::Value(at_fixed_arrangement(Section::Right, &right_demand, legs, spacing, profile)?);
                }
            }
        }
        EndSpacingStrategy::IndependentEnds => {
            for section in [Section::Left, Section::Right] {
                if let (Some(current), Some(d)) = (stirrups.get(section).value(), demand_at(section)) {
                    if current.spacing_mm > limits.end_mm {
                        let reselected = reselect(section, &d, &[limits.end_mm], legs, profile)?;
                        *governed.get_mut(section) = Outcome::Value(reselected);
                    }
                }
            }
        }
    }

    if let (Some(current), Some(d)) = (stirrups.middle.value(), demand_at(Section::Middle)) {
        if current.spacing_mm > limits.centre_mm {
            let allowed: Vec<u32> = profile
                .stirrup_spacings_mm
                .iter()
                .copied()
                .filter(|&s| s <= limits.centre_mm)
                .collect();
            governed.middle = Outcome::Value(reselect(Section::Middle, &d, &allowed, legs, profile)?);
        }
    }

    Ok(governed)
}

/// Full search restricted to `spacings`
fn reselect(
    section: Section,
    demand: &Demand,
    spacings: &[u32],
    legs: &[u32],
    profile: &DesignCodeProfile,
) -> CalcResult<Stirrups> {
    let stirrups = select_stirrups(demand.total, demand.torsion, &profile.stirrup_diameters_mm, spacings, legs)
        .ok_or_else(|| CalcError::catalog_exhausted(STAGE, section.label(), demand.total))?;
    debug!(%section, callout = %stirrups, "re-selected stirrups at spacing limit");
    Ok(stirrups)
}

/// Smallest diameter carrying the demand at a fixed legs/spacing pair
fn at_fixed_arrangement(
    section: Section,
    demand: &Demand,
    legs: u32,
    spacing_mm: u32,
    profile: &DesignCodeProfile,
) -> CalcResult<Stirrups> {
    let dia_mm = first_fit(&profile.stirrup_diameters_mm, |d| {
        Stirrups {
            legs,
            dia_mm: d,
            spacing_mm,
        }
        .satisfies(demand.total, demand.torsion)
    })
    .ok_or_else(|| CalcError::catalog_exhausted(STAGE, section.label(), demand.total))?;
    let stirrups = Stirrups {
        legs,
        dia_mm,
        spacing_mm,
    };
    debug!(%section, callout = %stirrups, "re-derived support stirrup diameter");
    Ok(stirrups)
}
