//! # Reinforcement Calculations
//!
//! One module per pipeline stage. Each stage is a plain function from typed
//! inputs to a typed, JSON-serializable result; [`pipeline::calculate`]
//! composes them for one beam record.
//!
//! ## Available Stages
//!
//! - [`geometry`] - Effective depth, bar count, stirrup legs
//! - [`torsion`] - Torsion redistribution into top/bottom steel
//! - [`flexure`] - Top and bottom bar selection, residual over-provision
//! - [`shear`] - Transverse demand and stirrup selection
//! - [`spacing`] - Stirrup spacing limits and re-selection
//! - [`side_face`] - Skin reinforcement for deep beams
//! - [`consolidation`] - Governing shear links and side-face callout
//! - [`transverse`] - Transverse-spacing check
//! - [`pipeline`] - All of the above, in order

pub mod consolidation;
pub mod flexure;
pub mod geometry;
pub mod pipeline;
pub mod shear;
pub mod side_face;
pub mod spacing;
pub mod torsion;
pub mod transverse;

// Re-export commonly used types
pub use flexure::{FaceSelection, LongitudinalBars};
pub use geometry::Geometry;
pub use pipeline::{calculate, BeamDesign};
pub use shear::Stirrups;
pub use side_face::SideFaceBars;
pub use spacing::SpacingLimits;
pub use transverse::TransverseSpacingCheck;
