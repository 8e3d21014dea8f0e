//! # Design-Code Profiles
//!
//! The selection engine is the same for every code edition; what changes is
//! data: the torsion-redistribution depth threshold, how many stirrup legs a
//! beam needs, which catalogs are searched, and how the support-region
//! stirrups are re-solved when the code spacing limit governs.
//!
//! ## Presets
//!
//! | Setting | [`aci_318_19`](DesignCodeProfile::aci_318_19) | [`legacy`](DesignCodeProfile::legacy) |
//! |---------|------------|--------|
//! | Torsion threshold depth | 700 mm | 600 mm |
//! | Required legs | code-based | width-banded |
//! | Leg search | required..bar count | fixed |
//! | End re-selection | uniform ends | independent ends |
//! | Transverse-spacing check | yes | no |
//!
//! ## TOML Example
//!
//! ```toml
//! name = "Project override"
//! torsion_threshold_depth_mm = 700
//! cover_mm = 40
//! leg_policy = "width_banded"
//! leg_search = "fixed"
//! end_spacing_strategy = "independent_ends"
//! ```
//!
//! Omitted fields fall back to the ACI 318-19 preset.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::errors::{CalcError, CalcResult};

/// How the minimum number of stirrup legs is derived from the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegPolicy {
    /// `ceil((min(d, 600) - 80) / b)`, at least 2 (ACI 318-19 Table 9.7.6.2.2)
    #[default]
    CodeBased,
    /// Width bands: < 400 → 2, < 800 → 4, otherwise 6
    WidthBanded,
}

/// Which leg counts the stirrup search may try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegSearch {
    /// From the required legs up to the longitudinal bar count, in steps of 2
    #[default]
    UpToBarCount,
    /// Only the required legs
    Fixed,
}

/// How support-region stirrups are re-solved when the spacing limit governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndSpacingStrategy {
    /// Both ends share one (legs, spacing) pair: the largest leg count of the
    /// three sections and the tighter end spacing, clamped to the limit.
    /// Diameter is re-derived per end.
    #[default]
    UniformEnds,
    /// Each offending end is re-solved on its own at the spacing limit.
    IndependentEnds,
}

/// Enumeration order for the two-layer flexural search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayerOrder {
    /// Second-layer diameter in the outer loop (smallest second layer first)
    #[default]
    SecondLayerOuter,
    /// First-layer diameter in the outer loop
    FirstLayerOuter,
}

/// Design-code profile driving every selection stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignCodeProfile {
    /// Label shown in schedule metadata
    pub name: String,

    /// Beams at or below this depth fold flexural torsion into top/bottom
    /// steel; deeper beams get side-face bars instead (mm)
    pub torsion_threshold_depth_mm: u32,

    /// Clear cover to stirrups (mm)
    pub cover_mm: u32,

    pub leg_policy: LegPolicy,
    pub leg_search: LegSearch,
    pub end_spacing_strategy: EndSpacingStrategy,
    pub layer_order: LayerOrder,

    /// Ascending
    pub longitudinal_diameters_mm: Vec<u32>,
    /// Ascending
    pub stirrup_diameters_mm: Vec<u32>,
    /// Descending
    pub stirrup_spacings_mm: Vec<u32>,
    /// Ascending
    pub side_face_diameters_mm: Vec<u32>,
    /// Descending
    pub side_face_spacings_mm: Vec<u32>,

    /// Evaluate the Vs > 0.33√fc'·b·d check (needs fc' and shear forces)
    pub transverse_spacing_check: bool,
}

impl Default for DesignCodeProfile {
    fn default() -> Self {
        DesignCodeProfile::aci_318_19()
    }
}

impl DesignCodeProfile {
    /// Current ACI 318-19 detailing
    pub fn aci_318_19() -> Self {
        DesignCodeProfile {
            name: "ACI 318-19".to_string(),
            torsion_threshold_depth_mm: 700,
            cover_mm: 40,
            leg_policy: LegPolicy::CodeBased,
            leg_search: LegSearch::UpToBarCount,
            end_spacing_strategy: EndSpacingStrategy::UniformEnds,
            layer_order: LayerOrder::SecondLayerOuter,
            longitudinal_diameters_mm: catalog::LONGITUDINAL_DIAMETERS_MM.to_vec(),
            stirrup_diameters_mm: catalog::STIRRUP_DIAMETERS_MM.to_vec(),
            stirrup_spacings_mm: catalog::STIRRUP_SPACINGS_MM.to_vec(),
            side_face_diameters_mm: catalog::SIDE_FACE_DIAMETERS_MM.to_vec(),
            side_face_spacings_mm: catalog::SIDE_FACE_SPACINGS_MM.to_vec(),
            transverse_spacing_check: true,
        }
    }

    /// Earlier office practice: 600 mm threshold, width-banded fixed legs
    pub fn legacy() -> Self {
        DesignCodeProfile {
            name: "Legacy".to_string(),
            torsion_threshold_depth_mm: 600,
            leg_policy: LegPolicy::WidthBanded,
            leg_search: LegSearch::Fixed,
            end_spacing_strategy: EndSpacingStrategy::IndependentEnds,
            transverse_spacing_check: false,
            ..DesignCodeProfile::aci_318_19()
        }
    }

    /// Look up a preset by its CLI name (`aci-318-19`, `legacy`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "aci-318-19" | "aci_318_19" | "aci318-19" => Some(DesignCodeProfile::aci_318_19()),
            "legacy" => Some(DesignCodeProfile::legacy()),
            _ => None,
        }
    }

    /// Parse and validate a profile from TOML text
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let profile: DesignCodeProfile = toml::from_str(text).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        DesignCodeProfile::from_toml_str(&text)
    }

    /// Check catalog ordering and basic ranges.
    pub fn validate(&self) -> CalcResult<()> {
        check_catalog("longitudinal_diameters_mm", &self.longitudinal_diameters_mm, Order::Ascending)?;
        check_catalog("stirrup_diameters_mm", &self.stirrup_diameters_mm, Order::Ascending)?;
        check_catalog("stirrup_spacings_mm", &self.stirrup_spacings_mm, Order::Descending)?;
        check_catalog("side_face_diameters_mm", &self.side_face_diameters_mm, Order::Ascending)?;
        check_catalog("side_face_spacings_mm", &self.side_face_spacings_mm, Order::Descending)?;
        if self.torsion_threshold_depth_mm == 0 {
            return Err(CalcError::invalid_profile("torsion_threshold_depth_mm must be positive"));
        }
        Ok(())
    }

    /// Whether a beam of this depth folds flexural torsion into top/bottom steel
    pub fn redistributes_torsion(&self, depth_mm: u32) -> bool {
        depth_mm <= self.torsion_threshold_depth_mm
    }
}

impl fmt::Display for DesignCodeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (threshold {} mm, {:?} legs, {:?})",
            self.name, self.torsion_threshold_depth_mm, self.leg_policy, self.end_spacing_strategy
        )
    }
}

enum Order {
    Ascending,
    Descending,
}

fn check_catalog(field: &str, values: &[u32], order: Order) -> CalcResult<()> {
    if values.is_empty() {
        return Err(CalcError::invalid_profile(format!("{} must not be empty", field)));
    }
    if values.contains(&0) {
        return Err(CalcError::invalid_profile(format!("{} must not contain 0", field)));
    }
    let ordered = values.windows(2).all(|w| match order {
        Order::Ascending => w[0] < w[1],
        Order::Descending => w[0] > w[1],
    });
    if !ordered {
        let expected = match order {
            Order::Ascending => "strictly ascending",
            Order::Descending => "strictly descending",
        };
        return Err(CalcError::invalid_profile(format!("{} must be {}", field, expected)));
    }
    Ok(())
}
