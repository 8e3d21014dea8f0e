//! # Transverse-Spacing Check
//!
//! Informational flag: when the steel shear `Vs = Vu - Vc` exceeds
//! `0.33 √fc' b d`, tighter stirrup leg spacing across the width applies.
//! `Vc = 0.17 √fc' b d` (ACI 318-19 Table 22.5.5.1), with `d` the effective
//! depth. Forces in kN, dimensions in mm, fc' in MPa.

use serde::{Deserialize, Serialize};

use crate::outcome::PerSection;

const VC_COEFFICIENT: f64 = 0.17;
const VS_LIMIT_COEFFICIENT: f64 = 0.33;

/// Result of the check, rendered "Yes"/"No" in the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransverseSpacingCheck {
    pub max_shear_kn: f64,
    pub vc_kn: f64,
    pub vs_limit_kn: f64,
    pub required: bool,
}

impl TransverseSpacingCheck {
    pub fn label(&self) -> &'static str {
        if self.required {
            "Yes"
        } else {
            "No"
        }
    }
}

pub fn calculate(
    shear_force_kn: &PerSection<f64>,
    fc_mpa: f64,
    width_mm: u32,
    effective_depth_mm: f64,
) -> TransverseSpacingCheck {
    let max_shear_kn = shear_force_kn
        .values()
        .into_iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let bd = width_mm as f64 * effective_depth_mm;
    let root_fc = fc_mpa.sqrt();
    let vc_kn = VC_COEFFICIENT * root_fc * bd * 1e-3;
    let vs_limit_kn = VS_LIMIT_COEFFICIENT * root_fc * bd * 1e-3;
    TransverseSpacingCheck {
        max_shear_kn,
        vc_kn,
        vs_limit_kn,
        required: max_shear_kn - vc_kn > vs_limit_kn,
    }
}
