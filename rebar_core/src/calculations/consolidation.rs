//! # Consolidation
//!
//! Worst-case-wins rules that turn three per-section selections into the
//! callouts placed on the drawing.
//!
//! - **Shear**: the section with the largest provided area governs. If it is
//!   the middle, its stirrups are used along the whole span; if it is an end,
//!   the same stirrups go at the opposite end and the middle is kept.
//! - **Side face**: one callout per beam, taken from the section with the
//!   largest area.

use tracing::debug;

use crate::calculations::shear::Stirrups;
use crate::calculations::side_face::SideFaceBars;
use crate::outcome::{Outcome, PerSection, Section, Unresolved};

/// Index of the first maximum; ties resolve towards the left
fn governing_section(areas: &PerSection<f64>) -> Section {
    let mut best = Section::Left;
    for (section, area) in areas.iter() {
        if *area > *areas.get(best) {
            best = section;
        }
    }
    best
}

/// Apply the shear consolidation rule. Triples containing a sentinel are
/// returned unchanged.
pub fn consolidate_shear(stirrups: &PerSection<Outcome<Stirrups>>) -> PerSection<Outcome<Stirrups>> {
    let resolved = PerSection::try_from_fn(|s| stirrups.get(s).value().copied().ok_or(()));
    let Ok(resolved) = resolved else {
        return *stirrups;
    };

    let governing = governing_section(&resolved.map(Stirrups::area_mm2_per_m));
    let mut consolidated = resolved;
    let chosen = *resolved.get(governing);
    match governing {
        Section::Middle => consolidated = PerSection::splat(chosen),
        end => *consolidated.get_mut(end.opposite()) = chosen,
    }
    debug!(%governing, callout = %chosen, "consolidated shear links");
    consolidated.map(|s| Outcome::Value(*s))
}

/// Single beam-wide side-face callout.
pub fn consolidate_side_face(bars: &PerSection<Outcome<SideFaceBars>>) -> Outcome<SideFaceBars> {
    let outcomes = bars.values();
    if outcomes.iter().any(|b| matches!(b, Outcome::NotNeeded)) {
        return Outcome::NotNeeded;
    }
    let resolved = PerSection::try_from_fn(|s| bars.get(s).value().copied().ok_or(()));
    match resolved {
        Ok(resolved) => {
            let governing = governing_section(&resolved.map(|b| b.area_mm2));
            Outcome::Value(*resolved.get(governing))
        }
        Err(()) => Outcome::Unresolvable(Unresolved::IncreaseSideFace),
    }
}

/// Area shown next to a consolidated side-face callout: 0 for sentinels
pub fn side_face_area_mm2(outcome: &Outcome<SideFaceBars>) -> f64 {
    outcome.value().map(|b| b.area_mm2).unwrap_or(0.0)
}
