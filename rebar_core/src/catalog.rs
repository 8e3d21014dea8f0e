//! # Reinforcement Catalog
//!
//! Standard bar diameters and spacings used when selecting reinforcement.
//! Diameter lists are ascending (smallest adequate bar wins); spacing lists are
//! descending (widest adequate spacing wins, since fewer bars are cheaper).
//!
//! | Use | Diameters (mm) | Spacings (mm) |
//! |-----|----------------|---------------|
//! | Longitudinal (top/bottom) | 16, 20, 25, 32 | - |
//! | Stirrups | 12, 16, 20, 25 | 250, 200, 150, 125, 100 |
//! | Side-face (skin) | 12, 16, 20, 25, 32 | 250, 200, 150 |
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::catalog::{bar_area_mm2, snap_spacing, STIRRUP_SPACINGS_MM};
//!
//! // T25 bar
//! assert!((bar_area_mm2(25) - 490.87).abs() < 0.01);
//!
//! // 160 mm is not a buildable spacing; it snaps down to 150 mm
//! assert_eq!(snap_spacing(160.0, &STIRRUP_SPACINGS_MM), 150);
//! ```

use std::f64::consts::PI;

/// ACI 318-19 clause references for the detailing rules implemented here.
pub mod aci_ref {
    /// Maximum transverse spacing of stirrup legs across the width
    pub const LEG_SPACING: &str = "ACI 318-19 Table 9.7.6.2.2";
    /// Maximum longitudinal hoop spacing near supports
    pub const HOOP_SPACING: &str = "ACI 318-19 18.4.2.4";
    /// Concrete shear capacity Vc
    pub const CONCRETE_SHEAR: &str = "ACI 318-19 Table 22.5.5.1";
}

/// Longitudinal bar diameters (mm), ascending
pub const LONGITUDINAL_DIAMETERS_MM: [u32; 4] = [16, 20, 25, 32];

/// Stirrup bar diameters (mm), ascending
pub const STIRRUP_DIAMETERS_MM: [u32; 4] = [12, 16, 20, 25];

/// Stirrup spacings (mm), descending
pub const STIRRUP_SPACINGS_MM: [u32; 5] = [250, 200, 150, 125, 100];

/// Side-face bar diameters (mm), ascending
pub const SIDE_FACE_DIAMETERS_MM: [u32; 5] = [12, 16, 20, 25, 32];

/// Side-face bar spacings (mm), descending
pub const SIDE_FACE_SPACINGS_MM: [u32; 3] = [250, 200, 150];

/// Cross-sectional area of one bar, π(d/2)² (mm²)
pub fn bar_area_mm2(diameter_mm: u32) -> f64 {
    let radius = diameter_mm as f64 / 2.0;
    PI * radius * radius
}

/// Transverse steel provided per metre of span by `legs` legs of a bar at
/// `spacing_mm` centres (mm²/m)
pub fn area_per_metre_mm2(diameter_mm: u32, spacing_mm: u32, legs: u32) -> f64 {
    (1000.0 / spacing_mm as f64) * bar_area_mm2(diameter_mm) * legs as f64
}

/// Snap a computed spacing limit down to a buildable catalog spacing.
///
/// Returns the largest catalog spacing not greater than `raw_mm`. If every
/// catalog spacing exceeds `raw_mm`, the smallest catalog spacing is returned.
/// With the default catalog this gives the banded rule
/// `[200,250) → 200`, `[150,200) → 150`, `[125,150) → 125`, `< 125 → 100`.
pub fn snap_spacing(raw_mm: f64, spacings_mm: &[u32]) -> u32 {
    let fitting = spacings_mm
        .iter()
        .copied()
        .filter(|&s| s as f64 <= raw_mm)
        .max();
    match fitting {
        Some(s) => s,
        None => spacings_mm.iter().copied().min().unwrap_or(0),
    }
}
