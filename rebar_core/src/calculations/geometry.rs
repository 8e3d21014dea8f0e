//! # Geometry and Count Derivation
//!
//! Quantities derived from the section size alone: effective depth,
//! longitudinal bar count per face, and the minimum number of stirrup legs.
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::calculations::geometry;
//! use rebar_core::profile::DesignCodeProfile;
//!
//! let geo = geometry::calculate(400, 800, &DesignCodeProfile::aci_318_19());
//! assert_eq!(geo.effective_depth_mm, 640.0);
//! assert_eq!(geo.bar_count, 3);
//! assert_eq!(geo.required_legs, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::profile::{DesignCodeProfile, LegPolicy, LegSearch};

/// Effective depth as a fraction of overall depth
pub const EFFECTIVE_DEPTH_RATIO: f64 = 0.8;

/// Depth cap used by the code-based leg rule (mm)
const LEG_RULE_DEPTH_CAP_MM: f64 = 600.0;

/// Allowance subtracted from the capped depth in the code-based leg rule (mm)
const LEG_RULE_ALLOWANCE_MM: f64 = 80.0;

/// Section-derived quantities used by every later stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub width_mm: u32,
    pub depth_mm: u32,
    /// 0.8 × depth (mm)
    pub effective_depth_mm: f64,
    /// Bars per layer on each face
    pub bar_count: u32,
    /// Minimum stirrup legs
    pub required_legs: u32,
}

impl Geometry {
    /// Leg counts the stirrup search may try, smallest first
    pub fn leg_options(&self, search: LegSearch) -> Vec<u32> {
        match search {
            LegSearch::Fixed => vec![self.required_legs],
            LegSearch::UpToBarCount => {
                let upper = self.required_legs.max(self.bar_count);
                (self.required_legs..=upper).step_by(2).collect()
            }
        }
    }
}

pub fn calculate(width_mm: u32, depth_mm: u32, profile: &DesignCodeProfile) -> Geometry {
    let effective_depth_mm = effective_depth_mm(depth_mm);
    Geometry {
        width_mm,
        depth_mm,
        effective_depth_mm,
        bar_count: longitudinal_bar_count(width_mm),
        required_legs: required_shear_legs(width_mm, effective_depth_mm, profile.leg_policy),
    }
}

pub fn effective_depth_mm(depth_mm: u32) -> f64 {
    EFFECTIVE_DEPTH_RATIO * depth_mm as f64
}

/// `floor(width / 100)`, less one when that exceeds 2, otherwise 2
pub fn longitudinal_bar_count(width_mm: u32) -> u32 {
    let count = width_mm / 100;
    if count > 2 {
        count - 1
    } else {
        2
    }
}

pub fn required_shear_legs(width_mm: u32, effective_depth_mm: f64, policy: LegPolicy) -> u32 {
    match policy {
        LegPolicy::CodeBased => {
            // Max leg spacing across the width is min(d, 600) (ACI 318-19 Table 9.7.6.2.2)
            let usable = effective_depth_mm.min(LEG_RULE_DEPTH_CAP_MM) - LEG_RULE_ALLOWANCE_MM;
            let legs = (usable / width_mm as f64).ceil();
            if legs > 2.0 {
                legs as u32
            } else {
                2
            }
        }
        LegPolicy::WidthBanded => match width_mm {
            w if w < 400 => 2,
            w if w < 800 => 4,
            _ => 6,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_depth() {
        for depth in [300, 500, 650, 800, 1200] {
            assert!((effective_depth_mm(depth) - 0.8 * depth as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_bar_count_boundaries() {
        assert_eq!(longitudinal_bar_count(150), 2);
        assert_eq!(longitudinal_bar_count(200), 2);
        assert_eq!(longitudinal_bar_count(300), 2);
        assert_eq!(longitudinal_bar_count(399), 2);
        assert_eq!(longitudinal_bar_count(400), 3);
        assert_eq!(longitudinal_bar_count(600), 5);
        assert_eq!(longitudinal_bar_count(1000), 9);
    }

    #[test]
    fn test_code_based_legs() {
        // (600 - 80) / 400 = 1.3 -> 2
        assert_eq!(required_shear_legs(400, 640.0, LegPolicy::CodeBased), 2);
        // Narrow deep beam: (600 - 80) / 200 = 2.6 -> 3
        assert_eq!(required_shear_legs(200, 800.0, LegPolicy::CodeBased), 3);
        // Shallow beam floors at 2
        assert_eq!(required_shear_legs(300, 80.0, LegPolicy::CodeBased), 2);
    }

    #[test]
    fn test_width_banded_legs() {
        assert_eq!(required_shear_legs(300, 400.0, LegPolicy::WidthBanded), 2);
        assert_eq!(required_shear_legs(400, 640.0, LegPolicy::WidthBanded), 4);
        assert_eq!(required_shear_legs(799, 640.0, LegPolicy::WidthBanded), 4);
        assert_eq!(required_shear_legs(800, 640.0, LegPolicy::WidthBanded), 6);
    }

    #[test]
    fn test_leg_options() {
        let geo = Geometry {
            width_mm: 800,
            depth_mm: 800,
            effective_depth_mm: 640.0,
            bar_count: 7,
            required_legs: 2,
        };
        assert_eq!(geo.leg_options(LegSearch::UpToBarCount), vec![2, 4, 6]);
        assert_eq!(geo.leg_options(LegSearch::Fixed), vec![2]);
    }

    #[test]
    fn test_leg_options_never_empty() {
        // Width-banded 4 legs with only 3 bars
        let geo = Geometry {
            width_mm: 400,
            depth_mm: 800,
            effective_depth_mm: 640.0,
            bar_count: 3,
            required_legs: 4,
        };
        assert_eq!(geo.leg_options(LegSearch::UpToBarCount), vec![4]);
    }
}
