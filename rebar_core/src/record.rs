//! # Beam Records
//!
//! A [`BeamRecord`] is one beam span as delivered by the ingestion step:
//! identity, geometry, per-section demand from the analysis envelope, and the
//! four overstress flags. Records are immutable inputs to the pipeline.
//!
//! ## Demand Groups and Their Flags
//!
//! | Demand | Units | Governing flag |
//! |--------|-------|----------------|
//! | `req_top_flex_mm2` | mm² | `neg_flex` |
//! | `req_bot_flex_mm2` | mm² | `pos_flex` |
//! | `req_flex_torsion_mm2` | mm² | `torsion` |
//! | `req_shear_mm2_per_m` | mm²/m | `shear` |
//! | `req_torsion_mm2_per_m` | mm²/m | `torsion` |
//!
//! A demand value may be `null` only when its governing flag is set; the
//! numbers of an overstressed group are meaningless and never read.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "story": "P2",
//!   "element_id": "B686",
//!   "width_mm": 400,
//!   "depth_mm": 800,
//!   "fc_mpa": 45.0,
//!   "flags": { "pos_flex": false, "neg_flex": false, "shear": false, "torsion": false },
//!   "req_top_flex_mm2": { "left": 1661, "middle": 989, "right": 2274 },
//!   "req_bot_flex_mm2": { "left": 989, "middle": 1076, "right": 1156 },
//!   "req_flex_torsion_mm2": { "left": 1814, "middle": 1814, "right": 1814 },
//!   "req_shear_mm2_per_m": { "left": 959.68, "middle": 403.94, "right": 1619.48 },
//!   "req_torsion_mm2_per_m": { "left": 332.8, "middle": 260.03, "right": 303.69 },
//!   "shear_force_kn": { "left": 410.0, "middle": 120.0, "right": 455.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::designation::SectionDesignation;
use crate::errors::{CalcError, CalcResult};
use crate::outcome::{PerSection, Section};

/// Overstress flags for the four governing load-combination checks.
///
/// `true` means the combination exceeded capacity somewhere in the beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverstressFlags {
    /// Positive (sagging) flexure - bottom steel
    pub pos_flex: bool,
    /// Negative (hogging) flexure - top steel
    pub neg_flex: bool,
    pub shear: bool,
    pub torsion: bool,
}

impl OverstressFlags {
    /// Build from the "True"/"False" strings used by the export format
    pub fn from_strs(pos_flex: &str, neg_flex: &str, shear: &str, torsion: &str) -> CalcResult<Self> {
        Ok(OverstressFlags {
            pos_flex: parse_flag("pos_flex_combo", pos_flex)?,
            neg_flex: parse_flag("neg_flex_combo", neg_flex)?,
            shear: parse_flag("shear_combo", shear)?,
            torsion: parse_flag("torsion_combo", torsion)?,
        })
    }

    /// True if any of the four checks failed
    pub fn any(&self) -> bool {
        self.pos_flex || self.neg_flex || self.shear || self.torsion
    }

    /// True if either flexural check failed
    pub fn any_flexure(&self) -> bool {
        self.pos_flex || self.neg_flex
    }

    /// True if the shear or torsion check failed
    pub fn any_transverse(&self) -> bool {
        self.shear || self.torsion
    }
}

/// Parse a boolean-as-string flag. Only `"True"` and `"False"` are accepted.
pub fn parse_flag(field: &str, value: &str) -> CalcResult<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(CalcError::invalid_flag(field, other)),
    }
}

/// Whether a governing-combo cell triple from the analysis export reports an
/// overstress: any cell reading `O/S`, `nan`, or empty.
pub fn combo_overstressed<S: AsRef<str>>(cells: &[S]) -> bool {
    cells.iter().any(|cell| {
        let cell = cell.as_ref().trim();
        cell.is_empty() || cell.eq_ignore_ascii_case("o/s") || cell.eq_ignore_ascii_case("nan")
    })
}

/// One beam span with its design-envelope demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRecord {
    /// Storey label (e.g. "P2", "L39")
    pub story: String,

    /// Element ID in the analysis model (e.g. "B686")
    pub element_id: String,

    /// Section width (mm)
    pub width_mm: u32,

    /// Section depth (mm)
    pub depth_mm: u32,

    /// Concrete cylinder strength fc' (MPa); only the transverse-spacing check reads it
    #[serde(default)]
    pub fc_mpa: Option<f64>,

    #[serde(default)]
    pub flags: OverstressFlags,

    /// Required top (hogging) steel per section (mm²)
    pub req_top_flex_mm2: PerSection<Option<f64>>,

    /// Required bottom (sagging) steel per section (mm²)
    pub req_bot_flex_mm2: PerSection<Option<f64>>,

    /// Required longitudinal torsion steel per section (mm²)
    pub req_flex_torsion_mm2: PerSection<Option<f64>>,

    /// Required shear steel per section (mm²/m)
    pub req_shear_mm2_per_m: PerSection<Option<f64>>,

    /// Required torsion transverse steel per section (mm²/m)
    pub req_torsion_mm2_per_m: PerSection<Option<f64>>,

    /// Envelope shear force per section (kN); only the transverse-spacing check reads it
    #[serde(default)]
    pub shear_force_kn: Option<PerSection<f64>>,
}

impl BeamRecord {
    /// Record with zero demand and no overstress. Useful as a base for
    /// builders and tests.
    pub fn new(story: impl Into<String>, element_id: impl Into<String>, width_mm: u32, depth_mm: u32) -> Self {
        let zero = PerSection::splat(Some(0.0));
        BeamRecord {
            story: story.into(),
            element_id: element_id.into(),
            width_mm,
            depth_mm,
            fc_mpa: None,
            flags: OverstressFlags::default(),
            req_top_flex_mm2: zero,
            req_bot_flex_mm2: zero,
            req_flex_torsion_mm2: zero,
            req_shear_mm2_per_m: zero,
            req_torsion_mm2_per_m: zero,
            shear_force_kn: None,
        }
    }

    /// Record whose geometry comes from a section name like `B400X600-C45/55`
    pub fn from_designation(
        story: impl Into<String>,
        element_id: impl Into<String>,
        designation: &str,
    ) -> CalcResult<Self> {
        let section = SectionDesignation::parse(designation)?;
        let mut record = BeamRecord::new(story, element_id, section.width_mm, section.depth_mm);
        record.fc_mpa = section.fc_mpa;
        Ok(record)
    }

    pub fn with_flags(mut self, flags: OverstressFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_top_flex(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.req_top_flex_mm2 = some3(left, middle, right);
        self
    }

    pub fn with_bot_flex(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.req_bot_flex_mm2 = some3(left, middle, right);
        self
    }

    pub fn with_flex_torsion(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.req_flex_torsion_mm2 = some3(left, middle, right);
        self
    }

    pub fn with_shear(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.req_shear_mm2_per_m = some3(left, middle, right);
        self
    }

    pub fn with_torsion(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.req_torsion_mm2_per_m = some3(left, middle, right);
        self
    }

    pub fn with_shear_force(mut self, left: f64, middle: f64, right: f64) -> Self {
        self.shear_force_kn = Some(PerSection::new(left, middle, right));
        self
    }

    pub fn with_fc(mut self, fc_mpa: f64) -> Self {
        self.fc_mpa = Some(fc_mpa);
        self
    }

    /// Validate geometry and resolve every demand group whose flag is clear.
    ///
    /// Overstressed groups resolve to zeros that no stage reads.
    pub fn validate(&self) -> CalcResult<Demands> {
        if self.width_mm == 0 {
            return Err(CalcError::invalid_input("width_mm", "0", "Width must be positive"));
        }
        if self.depth_mm == 0 {
            return Err(CalcError::invalid_input("depth_mm", "0", "Depth must be positive"));
        }
        if let Some(fc) = self.fc_mpa {
            if !fc.is_finite() || fc <= 0.0 {
                return Err(CalcError::invalid_input("fc_mpa", fc.to_string(), "fc' must be positive"));
            }
        }
        if let Some(forces) = &self.shear_force_kn {
            for (section, v) in forces.iter() {
                if !v.is_finite() {
                    return Err(CalcError::invalid_input(
                        format!("shear_force_kn.{}", section.label()),
                        v.to_string(),
                        "Shear force must be a finite number",
                    ));
                }
            }
        }

        let flags = &self.flags;
        Ok(Demands {
            top_flex_mm2: resolve("req_top_flex_mm2", &self.req_top_flex_mm2, flags.neg_flex)?,
            bot_flex_mm2: resolve("req_bot_flex_mm2", &self.req_bot_flex_mm2, flags.pos_flex)?,
            flex_torsion_mm2: resolve("req_flex_torsion_mm2", &self.req_flex_torsion_mm2, flags.torsion)?,
            shear_mm2_per_m: resolve("req_shear_mm2_per_m", &self.req_shear_mm2_per_m, flags.shear)?,
            torsion_mm2_per_m: resolve("req_torsion_mm2_per_m", &self.req_torsion_mm2_per_m, flags.torsion)?,
        })
    }
}

fn some3(left: f64, middle: f64, right: f64) -> PerSection<Option<f64>> {
    PerSection::new(Some(left), Some(middle), Some(right))
}

/// Numeric demand after validation. Values of overstressed groups are 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Demands {
    pub top_flex_mm2: PerSection<f64>,
    pub bot_flex_mm2: PerSection<f64>,
    pub flex_torsion_mm2: PerSection<f64>,
    pub shear_mm2_per_m: PerSection<f64>,
    pub torsion_mm2_per_m: PerSection<f64>,
}

fn resolve(field: &str, values: &PerSection<Option<f64>>, overstressed: bool) -> CalcResult<PerSection<f64>> {
    PerSection::try_from_fn(|section: Section| {
        let name = format!("{}.{}", field, section.label());
        match values.get(section) {
            None if overstressed => Ok(0.0),
            None => Err(CalcError::missing_field(name)),
            // Numbers under an overstress flag are ignored, even if garbage
            Some(_) if overstressed => Ok(0.0),
            Some(v) if !v.is_finite() => Err(CalcError::invalid_input(name, v.to_string(), "Demand must be a finite number")),
            Some(v) if *v < 0.0 => Err(CalcError::invalid_input(name, v.to_string(), "Demand must not be negative")),
            Some(v) => Ok(*v),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_is_exact() {
        assert!(parse_flag("shear_combo", "True").unwrap());
        assert!(!parse_flag("shear_combo", "False").unwrap());
        assert!(parse_flag("shear_combo", "true").is_err());
        assert!(parse_flag("shear_combo", "").is_err());
    }

    #[test]
    fn test_flags_from_strs() {
        let flags = OverstressFlags::from_strs("False", "True", "False", "False").unwrap();
        assert!(flags.neg_flex);
        assert!(flags.any());
        assert!(flags.any_flexure());
        assert!(!flags.any_transverse());
    }

    #[test]
    fn test_combo_cells() {
        assert!(combo_overstressed(&["OK", "O/S", "OK"]));
        assert!(combo_overstressed(&["OK", "nan", "OK"]));
        assert!(combo_overstressed(&["OK", " ", "OK"]));
        assert!(!combo_overstressed(&["OK", "OK", "OK"]));
    }

    #[test]
    fn test_from_designation() {
        let record = BeamRecord::from_designation("P2", "B686", "B400X800-C45/55").unwrap();
        assert_eq!(record.width_mm, 400);
        assert_eq!(record.depth_mm, 800);
        assert_eq!(record.fc_mpa, Some(45.0));
    }

    #[test]
    fn test_missing_demand_rejected_when_not_overstressed() {
        let mut record = BeamRecord::new("L1", "B1", 300, 500);
        record.req_shear_mm2_per_m.middle = None;
        let err = record.validate().unwrap_err();
        assert_eq!(err, CalcError::missing_field("req_shear_mm2_per_m.middle"));
    }

    #[test]
    fn test_missing_demand_allowed_when_overstressed() {
        let mut record = BeamRecord::new("L1", "B1", 300, 500);
        record.req_shear_mm2_per_m = PerSection::splat(None);
        record.flags.shear = true;
        let demands = record.validate().unwrap();
        assert_eq!(demands.shear_mm2_per_m, PerSection::splat(0.0));
    }

    #[test]
    fn test_non_finite_demand_rejected() {
        let record = BeamRecord::new("L1", "B1", 300, 500).with_top_flex(100.0, f64::NAN, 100.0);
        assert_eq!(record.validate().unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_non_finite_shear_force_rejected() {
        let record = BeamRecord::new("L1", "B1", 300, 500).with_shear_force(f64::NAN, 100.0, 100.0);
        let err = record.validate().unwrap_err();
        assert_eq!(err, CalcError::invalid_input("shear_force_kn.left", "NaN", "Shear force must be a finite number"));

        let record = BeamRecord::new("L1", "B1", 300, 500).with_shear_force(100.0, 100.0, f64::INFINITY);
        match record.validate().unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "shear_force_kn.right"),
            other => panic!("unexpected error {:?}", other),
        }

        // Negative forces are valid reactions
        let record = BeamRecord::new("L1", "B1", 300, 500).with_shear_force(-410.0, 0.0, 455.0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_negative_demand_rejected() {
        let record = BeamRecord::new("L1", "B1", 300, 500).with_torsion(-1.0, 0.0, 0.0);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_zero_width_rejected() {
        let record = BeamRecord::new("L1", "B1", 0, 500);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_record_json_roundtrip_with_nulls() {
        let json = r#"{
            "story": "L2", "element_id": "B33", "width_mm": 300, "depth_mm": 600,
            "flags": { "pos_flex": false, "neg_flex": false, "shear": true, "torsion": false },
            "req_top_flex_mm2": { "left": 500, "middle": 200, "right": 500 },
            "req_bot_flex_mm2": { "left": 300, "middle": 450, "right": 300 },
            "req_flex_torsion_mm2": { "left": 0, "middle": 0, "right": 0 },
            "req_shear_mm2_per_m": { "left": null, "middle": null, "right": null },
            "req_torsion_mm2_per_m": { "left": 0, "middle": 0, "right": 0 }
        }"#;
        let record: BeamRecord = serde_json::from_str(json).unwrap();
        assert!(record.flags.shear);
        assert_eq!(record.fc_mpa, None);
        assert!(record.validate().is_ok());
    }
}
