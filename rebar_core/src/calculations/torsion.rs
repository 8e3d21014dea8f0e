//! # Torsion Redistribution
//!
//! In beams no deeper than the profile threshold, longitudinal torsion steel
//! is carried by the top and bottom bars: half of each section's flexural
//! torsion demand is added to each face and the torsion demand is cleared.
//! Deeper beams keep the torsion demand for side-face sizing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::outcome::PerSection;
use crate::profile::DesignCodeProfile;
use crate::record::{Demands, OverstressFlags};

/// Longitudinal demand after redistribution (mm²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalDemand {
    pub top_mm2: PerSection<f64>,
    pub bottom_mm2: PerSection<f64>,
    pub flex_torsion_mm2: PerSection<f64>,
    /// Whether torsion was folded into the faces
    pub redistributed: bool,
}

impl LongitudinalDemand {
    /// Top and bottom demand include torsion whose combo failed
    pub fn carries_torsion_overstress(&self, flags: &OverstressFlags) -> bool {
        self.redistributed && flags.torsion
    }
}

pub fn redistribute(demands: &Demands, depth_mm: u32, profile: &DesignCodeProfile) -> LongitudinalDemand {
    if !profile.redistributes_torsion(depth_mm) {
        return LongitudinalDemand {
            top_mm2: demands.top_flex_mm2,
            bottom_mm2: demands.bot_flex_mm2,
            flex_torsion_mm2: demands.flex_torsion_mm2,
            redistributed: false,
        };
    }

    debug!(
        depth_mm,
        threshold_mm = profile.torsion_threshold_depth_mm,
        "folding flexural torsion into top and bottom steel"
    );
    let half = demands.flex_torsion_mm2.map(|t| t / 2.0);
    LongitudinalDemand {
        top_mm2: PerSection::from_fn(|s| demands.top_flex_mm2.get(s) + half.get(s)),
        bottom_mm2: PerSection::from_fn(|s| demands.bot_flex_mm2.get(s) + half.get(s)),
        flex_torsion_mm2: PerSection::splat(0.0),
        redistributed: true,
    }
}
