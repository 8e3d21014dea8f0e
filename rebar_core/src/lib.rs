//! # rebar_core - Reinforced-Concrete Beam Reinforcement Scheduler
//!
//! `rebar_core` turns per-beam design-envelope demand (required steel areas
//! for flexure, shear and torsion at the left support, midspan and right
//! support) into constructible ACI 318-19 rebar callouts such as `3T25 + 3T20`,
//! `4L-T12@200` and `T12@200 EF`. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: each stage is a pure function of earlier stage results
//! - **One engine, many codes**: code-edition differences live in a [`DesignCodeProfile`]
//! - **Typed outcomes**: overstress and unresolved sections are [`Outcome`] values,
//!   rendered to the report sentinels only at the boundary
//! - **Rich Errors**: malformed input and exhausted catalogs are structured [`CalcError`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use rebar_core::{calculate, BeamRecord, DesignCodeProfile};
//!
//! let record = BeamRecord::new("P2", "B686", 400, 800)
//!     .with_top_flex(1661.0, 989.0, 2274.0)
//!     .with_bot_flex(989.0, 1076.0, 1156.0)
//!     .with_flex_torsion(1814.0, 1814.0, 1814.0)
//!     .with_shear(959.68, 403.94, 1619.48)
//!     .with_torsion(332.8, 260.03, 303.69);
//!
//! let design = calculate(&record, &DesignCodeProfile::aci_318_19()).unwrap();
//! assert_eq!(design.top.bars.left.to_string(), "3T32");
//! assert_eq!(design.side_face.to_string(), "T16@150 EF");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The selection pipeline, one module per stage
//! - [`record`] - Beam records, overstress flags, input validation
//! - [`profile`] - Design-code profiles (ACI 318-19, legacy)
//! - [`catalog`] - Bar diameters, spacings, areas
//! - [`outcome`] - Per-section triples and typed outcomes
//! - [`search`] - First-fit catalog search
//! - [`designation`] - Section name parsing (`B400X600-C45/55`)
//! - [`schedule`] - Parallel schedule assembly
//! - [`errors`] - Structured error types
//! - [`file_io`] - Record loading and atomic schedule saves

pub mod calculations;
pub mod catalog;
pub mod designation;
pub mod errors;
pub mod file_io;
pub mod outcome;
pub mod profile;
pub mod record;
pub mod schedule;
pub mod search;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, BeamDesign};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_beam_records, load_schedule, save_schedule};
pub use outcome::{Cell, Outcome, PerSection, Section};
pub use profile::DesignCodeProfile;
pub use record::{BeamRecord, OverstressFlags};
pub use schedule::{build_schedule, Schedule, ScheduleEntry, ScheduleMetadata, ScheduleRow};
