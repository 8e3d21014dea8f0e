//! Section designation parsing.
//!
//! Analysis exports name beam sections like `B400X600-C45/55`: a type prefix,
//! width × depth in millimetres, then the concrete grade as
//! `C<cylinder fc'>/<cube fcu>`. Only the prefix letters are tolerated as
//! noise; anything else is an [`InvalidDesignation`](crate::CalcError::InvalidDesignation).
//!
//! ```rust
//! use rebar_core::designation::SectionDesignation;
//!
//! let section = SectionDesignation::parse("B400X600-C45/55").unwrap();
//! assert_eq!(section.width_mm, 400);
//! assert_eq!(section.depth_mm, 600);
//! assert_eq!(section.fc_mpa, Some(45.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Width, depth and (optional) concrete grade read from a section name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionDesignation {
    pub width_mm: u32,
    pub depth_mm: u32,
    /// Cylinder compressive strength fc' (MPa)
    pub fc_mpa: Option<f64>,
}

impl SectionDesignation {
    pub fn parse(designation: &str) -> CalcResult<Self> {
        let trimmed = designation.trim();
        let upper = trimmed.to_ascii_uppercase();

        // Dimensions start at the first digit
        let start = upper
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| CalcError::invalid_designation(trimmed, "no dimensions found"))?;
        let body = &upper[start..];

        let (dims, grade) = match body.split_once('-') {
            Some((dims, grade)) => (dims, Some(grade)),
            None => (body, None),
        };

        let (width, depth) = dims
            .split_once('X')
            .ok_or_else(|| CalcError::invalid_designation(trimmed, "missing 'X' between width and depth"))?;

        let width_mm = parse_dimension(trimmed, "width", width)?;
        let depth_mm = parse_dimension(trimmed, "depth", depth)?;
        let fc_mpa = match grade {
            Some(grade) => Some(parse_grade(trimmed, grade)?),
            None => None,
        };

        Ok(SectionDesignation {
            width_mm,
            depth_mm,
            fc_mpa,
        })
    }
}

fn parse_dimension(designation: &str, what: &str, text: &str) -> CalcResult<u32> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| CalcError::invalid_designation(designation, format!("{} '{}' is not a whole number", what, text)))?;
    if value == 0 {
        return Err(CalcError::invalid_designation(designation, format!("{} must be positive", what)));
    }
    Ok(value)
}

/// `C45/55` → 45.0
fn parse_grade(designation: &str, grade: &str) -> CalcResult<f64> {
    let grade = grade
        .trim()
        .strip_prefix('C')
        .ok_or_else(|| CalcError::invalid_designation(designation, "grade must start with 'C'"))?;
    let cylinder = grade.split('/').next().unwrap_or_default();
    let fc: f64 = cylinder
        .parse()
        .map_err(|_| CalcError::invalid_designation(designation, format!("grade '{}' is not numeric", cylinder)))?;
    if fc <= 0.0 {
        return Err(CalcError::invalid_designation(designation, "fc' must be positive"));
    }
    Ok(fc)
}
