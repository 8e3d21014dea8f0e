//! # Flexural Bar Selection
//!
//! Selects top or bottom longitudinal bars at each section from the
//! longitudinal diameter catalog. The bar count per layer is fixed by the
//! section width; only diameters are searched.
//!
//! 1. One layer: the first (smallest) diameter with `n × A(d) > required`.
//! 2. Two layers: the first `(d1, d2)` pair with `n × A(d1) + n × A(d2) > required`,
//!    in the profile's [`LayerOrder`].
//! 3. Otherwise [`Unresolved::IncreaseBarCount`].
//!
//! Selection is first-fit, not best-fit: a pair found earlier wins even when a
//! later pair would leave less excess.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::calculations::flexure::select_bars;
//! use rebar_core::profile::DesignCodeProfile;
//!
//! let profile = DesignCodeProfile::aci_318_19();
//! let bars = select_bars(989.0, 3, &profile);
//! assert_eq!(bars.to_string(), "3T25");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::bar_area_mm2;
use crate::outcome::{Outcome, Overstress, PerSection, Section, Unresolved};
use crate::profile::{DesignCodeProfile, LayerOrder};
use crate::search::{first_fit, first_fit2};

/// Longitudinal bars at one face of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongitudinalBars {
    /// Bars per layer
    pub count: u32,
    pub first_dia_mm: u32,
    /// Present only when a second layer is needed
    pub second_dia_mm: Option<u32>,
}

impl LongitudinalBars {
    /// Provided area over both layers (mm²)
    pub fn area_mm2(&self) -> f64 {
        let n = self.count as f64;
        let second = self.second_dia_mm.map(bar_area_mm2).unwrap_or(0.0);
        n * bar_area_mm2(self.first_dia_mm) + n * second
    }

    /// Second-layer diameter, 0 when single layer
    pub fn second_dia_or_zero(&self) -> u32 {
        self.second_dia_mm.unwrap_or(0)
    }
}

impl fmt::Display for LongitudinalBars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.count, self.first_dia_mm)?;
        if let Some(second) = self.second_dia_mm {
            write!(f, " + {}T{}", self.count, second)?;
        }
        Ok(())
    }
}

/// Bars for one face (top or bottom) at all three sections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSelection {
    pub bars: PerSection<Outcome<LongitudinalBars>>,
}

impl FaceSelection {
    /// Provided area per section, sentinels carried through
    pub fn provided_mm2(&self) -> PerSection<Outcome<f64>> {
        self.bars.map(|b| b.map(LongitudinalBars::area_mm2))
    }

    /// Largest first-layer diameter over the sections (0 if none resolved)
    pub fn max_first_dia_mm(&self) -> u32 {
        self.resolved().map(|b| b.first_dia_mm).max().unwrap_or(0)
    }

    /// Largest second-layer diameter over the sections (0 if none used)
    pub fn max_second_dia_mm(&self) -> u32 {
        self.resolved().map(|b| b.second_dia_or_zero()).max().unwrap_or(0)
    }

    /// Smallest bar diameter in either layer over the sections
    pub fn min_dia_mm(&self) -> Option<u32> {
        self.resolved()
            .flat_map(|b| std::iter::once(b.first_dia_mm).chain(b.second_dia_mm))
            .min()
    }

    pub fn all_resolved(&self) -> bool {
        self.bars.values().iter().all(|b| b.is_value())
    }

    pub fn any_overstressed(&self) -> bool {
        self.bars.values().iter().any(|b| b.is_overstressed())
    }

    fn resolved(&self) -> impl Iterator<Item = &LongitudinalBars> {
        self.bars.values().into_iter().filter_map(|b| b.value())
    }
}

/// Select bars for a single section that is not overstressed.
pub fn select_bars(required_mm2: f64, count: u32, profile: &DesignCodeProfile) -> Outcome<LongitudinalBars> {
    let diameters = &profile.longitudinal_diameters_mm;
    let n = count as f64;

    if let Some(dia) = first_fit(diameters, |d| n * bar_area_mm2(d) > required_mm2) {
        return Outcome::Value(LongitudinalBars {
            count,
            first_dia_mm: dia,
            second_dia_mm: None,
        });
    }

    let provides = |d1: u32, d2: u32| n * bar_area_mm2(d1) + n * bar_area_mm2(d2) > required_mm2;
    let pair = match profile.layer_order {
        LayerOrder::SecondLayerOuter => first_fit2(diameters, diameters, |d2, d1| provides(d1, d2)).map(|(d2, d1)| (d1, d2)),
        LayerOrder::FirstLayerOuter => first_fit2(diameters, diameters, provides),
    };

    match pair {
        Some((d1, d2)) => Outcome::Value(LongitudinalBars {
            count,
            first_dia_mm: d1,
            second_dia_mm: Some(d2),
        }),
        None => Outcome::Unresolvable(Unresolved::IncreaseBarCount),
    }
}

/// Select bars for one face at all three sections.
///
/// `overstressed` is the face's governing flexure flag; when set, every
/// section is [`Overstress::Section`] and no search runs.
pub fn select_face(
    face: &str,
    required_mm2: &PerSection<f64>,
    overstressed: bool,
    count: u32,
    profile: &DesignCodeProfile,
) -> FaceSelection {
    if overstressed {
        warn!(face, "flexure combo overstressed, skipping bar selection");
        return FaceSelection {
            bars: PerSection::splat(Outcome::Overstressed(Overstress::Section)),
        };
    }

    let bars = PerSection::from_fn(|section: Section| {
        let required = *required_mm2.get(section);
        let bars = select_bars(required, count, profile);
        match &bars {
            Outcome::Value(b) => debug!(face, %section, required, callout = %b, "selected longitudinal bars"),
            other => warn!(face, %section, required, outcome = %other, "longitudinal bars unresolved"),
        }
        bars
    });
    FaceSelection { bars }
}

/// Over-provision per section: `(top provided - top required) + (bottom provided - bottom required)`.
///
/// `None` unless all six provided areas are numeric.
pub fn residual_mm2(
    top: &FaceSelection,
    top_required: &PerSection<f64>,
    bottom: &FaceSelection,
    bottom_required: &PerSection<f64>,
) -> Option<PerSection<f64>> {
    let top_provided = top.provided_mm2();
    let bottom_provided = bottom.provided_mm2();
    PerSection::try_from_fn(|s| {
        let t = top_provided.get(s).value().ok_or(())?;
        let b = bottom_provided.get(s).value().ok_or(())?;
        Ok::<f64, ()>((t - top_required.get(s)) + (b - bottom_required.get(s)))
    })
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aci() -> DesignCodeProfile {
        DesignCodeProfile::aci_318_19()
    }

    #[test]
    fn test_single_layer_first_fit() {
        assert_eq!(select_bars(989.0, 3, &aci()).to_string(), "3T25");
        assert_eq!(select_bars(1661.0, 3, &aci()).to_string(), "3T32");
        assert_eq!(select_bars(0.0, 2, &aci()).to_string(), "2T16");
    }

    #[test]
    fn test_requirement_is_strict() {
        // 3T20 provides exactly 942.48; requiring that much moves to T25
        let exact = 3.0 * bar_area_mm2(20);
        assert_eq!(select_bars(exact, 3, &aci()).to_string(), "3T25");
        assert_eq!(select_bars(exact - 0.01, 3, &aci()).to_string(), "3T20");
    }

    #[test]
    fn test_two_layer_callout() {
        // Without T32 the single layer tops out at 3T25 = 1472.6
        let mut profile = aci();
        profile.longitudinal_diameters_mm = vec![16, 20, 25];
        let bars = select_bars(2274.0, 3, &profile);
        assert_eq!(bars.to_string(), "3T25 + 3T20");
        let bars = bars.value().copied().unwrap();
        assert_eq!(bars.first_dia_mm, 25);
        assert_eq!(bars.second_dia_mm, Some(20));
        assert!(bars.area_mm2() > 2274.0);
    }

    #[test]
    fn test_two_layer_is_first_fit_not_min_excess() {
        let mut profile = aci();
        profile.longitudinal_diameters_mm = vec![16, 20, 25];
        // 3T25 + 3T16 (2075.8) is tried before 3T20 + 3T20 (1885.0), so it
        // wins for 1800 even though 3T20 + 3T20 leaves less excess
        let bars = select_bars(1800.0, 3, &profile);
        assert_eq!(bars.to_string(), "3T25 + 3T16");
    }

    #[test]
    fn test_layer_order_changes_tie_break() {
        let mut profile = aci();
        profile.longitudinal_diameters_mm = vec![16, 20, 25];
        profile.layer_order = LayerOrder::FirstLayerOuter;
        // First layer outer: (16,25) = 2075.8 is found before (20,20)
        assert_eq!(select_bars(1800.0, 3, &profile).to_string(), "3T16 + 3T25");
    }

    #[test]
    fn test_unresolvable_beyond_two_layers_of_largest_bar() {
        // 2 × 3T32 = 4825.5
        let bars = select_bars(5000.0, 3, &aci());
        assert_eq!(bars, Outcome::Unresolvable(Unresolved::IncreaseBarCount));
        assert_eq!(bars.to_string(), "Increase rebar count or re-assess");
    }

    #[test]
    fn test_single_layer_monotonic() {
        let profile = aci();
        let mut last_dia = 0;
        let mut went_two_layer = false;
        for step in 0..60 {
            let required = step as f64 * 50.0;
            let bars = select_bars(required, 3, &profile);
            let bars = bars.value().copied().unwrap();
            if bars.second_dia_mm.is_some() {
                went_two_layer = true;
            } else {
                assert!(!went_two_layer, "fell back to one layer at {}", required);
                assert!(bars.first_dia_mm >= last_dia);
                last_dia = bars.first_dia_mm;
            }
        }
    }

    #[test]
    fn test_overstressed_face() {
        let face = select_face("top", &PerSection::splat(100.0), true, 3, &aci());
        assert!(face.any_overstressed());
        assert_eq!(face.bars.middle.to_string(), "Overstressed. Please re-assess");
        assert_eq!(face.max_first_dia_mm(), 0);
    }

    #[test]
    fn test_face_diameters() {
        let face = select_face("top", &PerSection::new(1661.0, 989.0, 2274.0), false, 3, &aci());
        assert_eq!(face.max_first_dia_mm(), 32);
        assert_eq!(face.max_second_dia_mm(), 0);
        assert_eq!(face.min_dia_mm(), Some(25));
        assert!(face.all_resolved());
    }

    #[test]
    fn test_residual() {
        let top_req = PerSection::new(1661.0, 989.0, 2274.0);
        let bot_req = PerSection::new(989.0, 1076.0, 1156.0);
        let top = select_face("top", &top_req, false, 3, &aci());
        let bottom = select_face("bottom", &bot_req, false, 3, &aci());
        let residual = residual_mm2(&top, &top_req, &bottom, &bot_req).unwrap();
        assert!((residual.left - 1235.36).abs() < 0.01);
        assert!((residual.middle - 880.24).abs() < 0.01);
        assert!((residual.right - 455.36).abs() < 0.01);
    }

    #[test]
    fn test_residual_undefined_when_any_section_unresolved() {
        let top_req = PerSection::new(100.0, 100.0, 9000.0);
        let bot_req = PerSection::splat(100.0);
        let top = select_face("top", &top_req, false, 3, &aci());
        let bottom = select_face("bottom", &bot_req, false, 3, &aci());
        assert!(residual_mm2(&top, &top_req, &bottom, &bot_req).is_none());
    }
}
