//! # Beam Reinforcement Pipeline
//!
//! Runs every selection stage for one beam record, in order:
//!
//! 1. Geometry: effective depth, bar count, required legs
//! 2. Torsion redistribution (shallow beams)
//! 3. Top and bottom bar selection
//! 4. Residual over-provision
//! 5. Shear/torsion combination and stirrup selection
//! 6. Spacing limits and re-selection
//! 7. Side-face bars (deep beams)
//! 8. Consolidation of shear links and side-face bars
//! 9. Transverse-spacing check (when the profile asks for it)
//!
//! Each stage only reads the results of earlier stages.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::calculations::pipeline::calculate;
//! use rebar_core::profile::DesignCodeProfile;
//! use rebar_core::record::BeamRecord;
//!
//! let record = BeamRecord::new("L1", "B12", 300, 500);
//! let design = calculate(&record, &DesignCodeProfile::aci_318_19()).unwrap();
//!
//! assert_eq!(design.top.bars.left.to_string(), "2T16");
//! assert_eq!(design.shear_links.left.to_string(), "2L-T12@100");
//! assert_eq!(design.side_face.to_string(), "Not needed");
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::consolidation;
use crate::calculations::flexure::{self, FaceSelection};
use crate::calculations::geometry::{self, Geometry};
use crate::calculations::shear::{self, Stirrups};
use crate::calculations::side_face::{self, CageDiameters, SideFaceBars, SideFaceInput};
use crate::calculations::spacing::{self, SpacingLimits};
use crate::calculations::torsion::{self, LongitudinalDemand};
use crate::calculations::transverse::{self, TransverseSpacingCheck};
use crate::errors::CalcResult;
use crate::outcome::{Outcome, PerSection};
use crate::profile::DesignCodeProfile;
use crate::record::{BeamRecord, OverstressFlags};

/// Every stage result for one beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDesign {
    pub story: String,
    pub element_id: String,
    pub flags: OverstressFlags,
    pub geometry: Geometry,

    /// Longitudinal demand after torsion redistribution
    pub longitudinal: LongitudinalDemand,
    pub top: FaceSelection,
    pub bottom: FaceSelection,

    /// Over-provision of top plus bottom steel (mm²)
    pub residual_mm2: Option<PerSection<f64>>,

    /// `shear + 2 × torsion` (mm²/m)
    pub transverse_demand: PerSection<Outcome<f64>>,
    /// Stirrups before the spacing limits are applied
    pub initial_stirrups: PerSection<Outcome<Stirrups>>,
    /// Present only when no section is overstressed or unresolved
    pub spacing_limits: Option<SpacingLimits>,
    /// Stirrups after spacing re-selection
    pub stirrups: PerSection<Outcome<Stirrups>>,

    pub clear_space_mm: f64,
    pub side_face_per_section: PerSection<Outcome<SideFaceBars>>,

    /// Consolidated stirrups shown on the drawing
    pub shear_links: PerSection<Outcome<Stirrups>>,
    /// Consolidated beam-wide side-face callout
    pub side_face: Outcome<SideFaceBars>,

    pub transverse_check: Option<TransverseSpacingCheck>,
}

impl BeamDesign {
    /// Provided shear link area per section after consolidation (mm²/m)
    pub fn shear_link_area_mm2_per_m(&self) -> PerSection<Outcome<f64>> {
        self.shear_links.map(|s| s.map(Stirrups::area_mm2_per_m))
    }

    /// Consolidated side-face area, 0 for sentinels (mm²)
    pub fn side_face_area_mm2(&self) -> f64 {
        consolidation::side_face_area_mm2(&self.side_face)
    }

    /// True if any drawn quantity is a sentinel rather than a callout
    pub fn has_sentinels(&self) -> bool {
        let mut bars = self.top.bars.values().into_iter().chain(self.bottom.bars.values());
        bars.any(|b| !b.is_value())
            || self.shear_links.values().iter().any(|s| !s.is_value())
            || matches!(self.side_face, Outcome::Overstressed(_) | Outcome::Unresolvable(_))
    }
}

/// Design the reinforcement for one beam.
pub fn calculate(record: &BeamRecord, profile: &DesignCodeProfile) -> CalcResult<BeamDesign> {
    let demands = record.validate()?;
    let flags = record.flags;

    let geometry = geometry::calculate(record.width_mm, record.depth_mm, profile);
    debug!(
        element = %record.element_id,
        effective_depth_mm = geometry.effective_depth_mm,
        bar_count = geometry.bar_count,
        required_legs = geometry.required_legs,
        "derived geometry"
    );

    let longitudinal = torsion::redistribute(&demands, record.depth_mm, profile);

    // Folded torsion from a failed combo makes both faces overstressed
    let torsion_in_faces = longitudinal.carries_torsion_overstress(&flags);
    let top = flexure::select_face(
        "top",
        &longitudinal.top_mm2,
        flags.neg_flex || torsion_in_faces,
        geometry.bar_count,
        profile,
    );
    let bottom = flexure::select_face(
        "bottom",
        &longitudinal.bottom_mm2,
        flags.pos_flex || torsion_in_faces,
        geometry.bar_count,
        profile,
    );
    let residual_mm2 = flexure::residual_mm2(&top, &longitudinal.top_mm2, &bottom, &longitudinal.bottom_mm2);

    let transverse_demand = shear::transverse_demand(&demands, &flags);
    let legs = geometry.leg_options(profile.leg_search);
    let initial_stirrups = shear::select_all(
        &transverse_demand,
        &demands.torsion_mm2_per_m,
        &profile.stirrup_diameters_mm,
        &profile.stirrup_spacings_mm,
        &legs,
    )?;

    let spacing_limits = spacing_limits(&flags, &geometry, &top, &bottom, &initial_stirrups, profile);
    let stirrups = match &spacing_limits {
        Some(limits) => spacing::govern(
            &initial_stirrups,
            &transverse_demand,
            &demands.torsion_mm2_per_m,
            limits,
            &legs,
            profile,
        )?,
        None => initial_stirrups,
    };

    let cage = CageDiameters {
        max_stirrup_mm: stirrups.values().iter().filter_map(|s| s.value()).map(|s| s.dia_mm).max().unwrap_or(0),
        max_top_first_mm: top.max_first_dia_mm(),
        max_top_second_mm: top.max_second_dia_mm(),
        max_bottom_first_mm: bottom.max_first_dia_mm(),
        max_bottom_second_mm: bottom.max_second_dia_mm(),
    };
    let clear_space_mm = side_face::clear_space_mm(record.depth_mm, profile.cover_mm, &cage);
    let side_face_per_section = side_face::calculate(
        &SideFaceInput {
            depth_mm: record.depth_mm,
            flex_torsion_mm2: &longitudinal.flex_torsion_mm2,
            residual_mm2: residual_mm2.as_ref(),
            any_overstress: flags.any(),
            clear_space_mm,
        },
        profile,
    )?;

    let shear_links = consolidation::consolidate_shear(&stirrups);
    let side_face = consolidation::consolidate_side_face(&side_face_per_section);

    let transverse_check = match (profile.transverse_spacing_check, record.fc_mpa, &record.shear_force_kn) {
        (true, Some(fc_mpa), Some(forces)) => Some(transverse::calculate(
            forces,
            fc_mpa,
            record.width_mm,
            geometry.effective_depth_mm,
        )),
        _ => None,
    };

    let design = BeamDesign {
        story: record.story.clone(),
        element_id: record.element_id.clone(),
        flags,
        geometry,
        longitudinal,
        top,
        bottom,
        residual_mm2,
        transverse_demand,
        initial_stirrups,
        spacing_limits,
        stirrups,
        clear_space_mm,
        side_face_per_section,
        shear_links,
        side_face,
        transverse_check,
    };
    if design.has_sentinels() {
        warn!(story = %design.story, element = %design.element_id, "beam needs re-assessment");
    }
    Ok(design)
}

/// Limits apply only when every flexural and transverse section resolved
fn spacing_limits(
    flags: &OverstressFlags,
    geometry: &Geometry,
    top: &FaceSelection,
    bottom: &FaceSelection,
    initial: &PerSection<Outcome<Stirrups>>,
    profile: &DesignCodeProfile,
) -> Option<SpacingLimits> {
    if flags.any_flexure() || flags.any_transverse() || !top.all_resolved() || !bottom.all_resolved() {
        return None;
    }
    let smallest_long = [top.min_dia_mm(), bottom.min_dia_mm()].into_iter().flatten().min()?;
    let smallest_stirrup = initial.values().iter().filter_map(|s| s.value()).map(|s| s.dia_mm).min()?;
    let limits = SpacingLimits::calculate(
        geometry.effective_depth_mm,
        smallest_long,
        smallest_stirrup,
        &profile.stirrup_spacings_mm,
    );
    debug!(end_mm = limits.end_mm, centre_mm = limits.centre_mm, "stirrup spacing limits");
    Some(limits)
}
