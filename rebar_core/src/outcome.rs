//! # Sections and Outcomes
//!
//! Every computed quantity in a beam schedule is evaluated at three sections
//! along the span (left support, midspan, right support) and may end up as a
//! number, or as one of a fixed set of report sentinels.
//!
//! - [`Section`] / [`PerSection`] - the left/middle/right triple
//! - [`Outcome`] - a value, or the reason there is no value
//! - [`Cell`] - mixed number/text cell for the report boundary
//!
//! ## Sentinel Text
//!
//! Sentinel strings are part of the downstream report format and must be
//! reproduced byte-for-byte. Note the two spellings of "re-assess": flexure
//! and stirrups use `"Overstressed. Please re-assess"`, side-face uses
//! `"Overstressed. Please reassess"`.
//!
//! ```rust
//! use rebar_core::outcome::{Outcome, Overstress};
//!
//! let os: Outcome<f64> = Outcome::Overstressed(Overstress::ShearAndTorsion);
//! assert_eq!(os.to_string(), "O/S in Shear and Torsion");
//!
//! let nn: Outcome<f64> = Outcome::NotNeeded;
//! assert_eq!(nn.to_string(), "Not needed");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Sections
// ============================================================================

/// Position along the beam span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Left,
    Middle,
    Right,
}

impl Section {
    /// All sections in report order
    pub const ALL: [Section; 3] = [Section::Left, Section::Middle, Section::Right];

    /// Lowercase label used in logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            Section::Left => "left",
            Section::Middle => "middle",
            Section::Right => "right",
        }
    }

    /// The end section at the other support. Middle maps to itself.
    pub fn opposite(&self) -> Section {
        match self {
            Section::Left => Section::Right,
            Section::Middle => Section::Middle,
            Section::Right => Section::Left,
        }
    }

    /// Whether this is a support (end) section
    pub fn is_end(&self) -> bool {
        !matches!(self, Section::Middle)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per section.
///
/// Serializes as `{ "left": .., "middle": .., "right": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerSection<T> {
    pub left: T,
    pub middle: T,
    pub right: T,
}

impl<T> PerSection<T> {
    pub fn new(left: T, middle: T, right: T) -> Self {
        PerSection { left, middle, right }
    }

    /// Build a triple by evaluating `f` at each section in report order
    pub fn from_fn(mut f: impl FnMut(Section) -> T) -> Self {
        PerSection {
            left: f(Section::Left),
            middle: f(Section::Middle),
            right: f(Section::Right),
        }
    }

    /// Fallible variant of [`PerSection::from_fn`]; stops at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Section) -> Result<T, E>) -> Result<Self, E> {
        Ok(PerSection {
            left: f(Section::Left)?,
            middle: f(Section::Middle)?,
            right: f(Section::Right)?,
        })
    }

    pub fn get(&self, section: Section) -> &T {
        match section {
            Section::Left => &self.left,
            Section::Middle => &self.middle,
            Section::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut T {
        match section {
            Section::Left => &mut self.left,
            Section::Middle => &mut self.middle,
            Section::Right => &mut self.right,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerSection<U> {
        PerSection {
            left: f(&self.left),
            middle: f(&self.middle),
            right: f(&self.right),
        }
    }

    /// Iterate `(section, value)` pairs in report order
    pub fn iter(&self) -> impl Iterator<Item = (Section, &T)> {
        [
            (Section::Left, &self.left),
            (Section::Middle, &self.middle),
            (Section::Right, &self.right),
        ]
        .into_iter()
    }

    pub fn values(&self) -> [&T; 3] {
        [&self.left, &self.middle, &self.right]
    }
}

impl<T: Clone> PerSection<T> {
    /// Same value at all three sections
    pub fn splat(value: T) -> Self {
        PerSection {
            left: value.clone(),
            middle: value.clone(),
            right: value,
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Why a section has no usable value because of an overstressed combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overstress {
    /// Flexural or stirrup quantity: "Overstressed. Please re-assess"
    Section,
    /// Side-face quantity: "Overstressed. Please reassess"
    SideFace,
    /// Transverse demand, shear combo failed: "O/S in Shear"
    Shear,
    /// Transverse demand, torsion combo failed: "O/S in Torsion"
    Torsion,
    /// Transverse demand, both failed: "O/S in Shear and Torsion"
    ShearAndTorsion,
}

impl Overstress {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overstress::Section => "Overstressed. Please re-assess",
            Overstress::SideFace => "Overstressed. Please reassess",
            Overstress::Shear => "O/S in Shear",
            Overstress::Torsion => "O/S in Torsion",
            Overstress::ShearAndTorsion => "O/S in Shear and Torsion",
        }
    }
}

impl fmt::Display for Overstress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a search could not produce a value although nothing is overstressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unresolved {
    /// Two layers of the largest bar are not enough
    IncreaseBarCount,
    /// Beam-wide side-face callout blocked by an unresolved section
    IncreaseSideFace,
}

impl Unresolved {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unresolved::IncreaseBarCount => "Increase rebar count or re-assess",
            Unresolved::IncreaseSideFace => "Rebar needs to be increased or re-assessed",
        }
    }
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one computed quantity at one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// A numeric or catalog value
    Value(T),
    /// The governing load combination exceeded capacity
    Overstressed(Overstress),
    /// Not applicable to this beam (side-face on shallow beams)
    NotNeeded,
    /// Search exhausted without an overstress
    Unresolvable(Unresolved),
}

impl<T> Outcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_overstressed(&self) -> bool {
        matches!(self, Outcome::Overstressed(_))
    }

    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> Outcome<U> {
        match self {
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Overstressed(o) => Outcome::Overstressed(*o),
            Outcome::NotNeeded => Outcome::NotNeeded,
            Outcome::Unresolvable(u) => Outcome::Unresolvable(*u),
        }
    }

    /// Sentinel text for non-value outcomes
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Overstressed(o) => Some(o.as_str()),
            Outcome::NotNeeded => Some("Not needed"),
            Outcome::Unresolvable(u) => Some(u.as_str()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(v) => fmt::Display::fmt(v, f),
            other => f.write_str(other.sentinel().unwrap_or_default()),
        }
    }
}

impl Outcome<f64> {
    /// Render for the report: numbers stay numbers, sentinels become text.
    pub fn to_cell(&self) -> Cell {
        match self {
            Outcome::Value(v) => Cell::Number(*v),
            other => Cell::Text(other.sentinel().unwrap_or_default().to_string()),
        }
    }
}

/// A report cell holding either a number or text.
///
/// Serialized untagged so JSON consumers see plain `1472.6` or `"O/S in Shear"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{:.2}", n),
            Cell::Text(t) => f.write_str(t),
        }
    }
}
