//! # Reinforcement Schedule
//!
//! A [`Schedule`] is the root container written to disk: metadata, the
//! design-code profile it was produced with, and one entry per beam record in
//! input order. Beams are designed in parallel; a beam whose pipeline fails
//! becomes a [`ScheduleEntry::Failed`] instead of aborting the batch.
//!
//! ## Structure
//!
//! ```text
//! Schedule
//! ├── meta: ScheduleMetadata (version, engineer, job, profile, timestamp)
//! ├── profile: DesignCodeProfile
//! └── entries: Vec<ScheduleEntry>
//!     ├── Designed(ScheduleRow)
//!     └── Failed { story, element_id, error }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rebar_core::profile::DesignCodeProfile;
//! use rebar_core::record::BeamRecord;
//! use rebar_core::schedule::{build_schedule, ScheduleMetadata};
//!
//! let records = vec![
//!     BeamRecord::new("L1", "B1", 300, 500),
//!     BeamRecord::new("L2", "B7", 400, 600),
//! ];
//! let profile = DesignCodeProfile::aci_318_19();
//! let schedule = build_schedule(&records, &profile, ScheduleMetadata::new("Engineer", "25-001", &profile)).unwrap();
//!
//! assert_eq!(schedule.rows().count(), 2);
//! assert_eq!(schedule.by_story().len(), 2);
//! ```

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculations::pipeline::{self, BeamDesign};
use crate::errors::{CalcError, CalcResult};
use crate::outcome::{Cell, Outcome, Overstress, PerSection};
use crate::profile::DesignCodeProfile;
use crate::record::BeamRecord;

/// Current schema version for schedule files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Schedule metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Name of the design-code profile used
    pub profile_name: String,

    pub generated: DateTime<Utc>,
}

impl ScheduleMetadata {
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, profile: &DesignCodeProfile) -> Self {
        ScheduleMetadata {
            version: SCHEMA_VERSION.to_string(),
            engineer: engineer.into(),
            job_id: job_id.into(),
            profile_name: profile.name.clone(),
            generated: Utc::now(),
        }
    }
}

/// Required and provided quantities behind each callout, for checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// mm²
    pub top_required: PerSection<Cell>,
    pub top_provided: PerSection<Cell>,
    pub bottom_required: PerSection<Cell>,
    pub bottom_provided: PerSection<Cell>,
    /// mm²/m
    pub shear_required: PerSection<Cell>,
    pub shear_provided: PerSection<Cell>,
}

/// One line of the drawing schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub story: String,
    pub element_id: String,
    pub width_mm: u32,
    pub depth_mm: u32,
    pub bottom: PerSection<String>,
    pub top: PerSection<String>,
    pub side_face: String,
    /// mm², 0 when the callout is a sentinel
    pub side_face_area_mm2: f64,
    /// Consolidated shear links
    pub shear_links: PerSection<String>,
    /// "Yes"/"No", absent when the check was not run
    pub transverse_spacing_check: Option<String>,
    pub criteria: Criteria,
}

impl ScheduleRow {
    pub fn from_design(design: &BeamDesign) -> Self {
        let flags = &design.flags;
        let required = |values: &PerSection<f64>, overstressed: bool| {
            values.map(|v| {
                if overstressed {
                    Outcome::<f64>::Overstressed(Overstress::Section).to_cell()
                } else {
                    Cell::Number(*v)
                }
            })
        };
        let cells = |values: PerSection<Outcome<f64>>| values.map(Outcome::to_cell);

        ScheduleRow {
            story: design.story.clone(),
            element_id: design.element_id.clone(),
            width_mm: design.geometry.width_mm,
            depth_mm: design.geometry.depth_mm,
            bottom: design.bottom.bars.map(|b| b.to_string()),
            top: design.top.bars.map(|b| b.to_string()),
            side_face: design.side_face.to_string(),
            side_face_area_mm2: design.side_face_area_mm2(),
            shear_links: design.shear_links.map(|s| s.to_string()),
            transverse_spacing_check: design.transverse_check.map(|c| c.label().to_string()),
            criteria: Criteria {
                top_required: required(&design.longitudinal.top_mm2, flags.neg_flex),
                top_provided: cells(design.top.provided_mm2()),
                bottom_required: required(&design.longitudinal.bottom_mm2, flags.pos_flex),
                bottom_provided: cells(design.bottom.provided_mm2()),
                shear_required: cells(design.transverse_demand),
                shear_provided: cells(design.shear_link_area_mm2_per_m()),
            },
        }
    }
}

/// Outcome of scheduling one beam record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleEntry {
    Designed(ScheduleRow),
    Failed {
        story: String,
        element_id: String,
        error: CalcError,
    },
}

impl ScheduleEntry {
    pub fn story(&self) -> &str {
        match self {
            ScheduleEntry::Designed(row) => &row.story,
            ScheduleEntry::Failed { story, .. } => story,
        }
    }

    pub fn element_id(&self) -> &str {
        match self {
            ScheduleEntry::Designed(row) => &row.element_id,
            ScheduleEntry::Failed { element_id, .. } => element_id,
        }
    }
}

/// Root schedule container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub meta: ScheduleMetadata,
    pub profile: DesignCodeProfile,
    /// One entry per input record, in input order
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Successfully designed rows, in input order
    pub fn rows(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.entries.iter().filter_map(|e| match e {
            ScheduleEntry::Designed(row) => Some(row),
            ScheduleEntry::Failed { .. } => None,
        })
    }

    /// `(story, element_id, error)` for every failed record
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str, &CalcError)> {
        self.entries.iter().filter_map(|e| match e {
            ScheduleEntry::Failed {
                story,
                element_id,
                error,
            } => Some((story.as_str(), element_id.as_str(), error)),
            ScheduleEntry::Designed(_) => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Entries grouped by storey, storeys in order of first appearance
    pub fn by_story(&self) -> Vec<(&str, Vec<&ScheduleEntry>)> {
        let mut groups: Vec<(&str, Vec<&ScheduleEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(story, _)| *story == entry.story()) {
                Some((_, group)) => group.push(entry),
                None => groups.push((entry.story(), vec![entry])),
            }
        }
        groups
    }
}

/// Design every record in parallel and assemble the schedule in input order.
///
/// Only an invalid profile fails the whole call; per-beam errors are recorded
/// as [`ScheduleEntry::Failed`].
pub fn build_schedule(
    records: &[BeamRecord],
    profile: &DesignCodeProfile,
    meta: ScheduleMetadata,
) -> CalcResult<Schedule> {
    profile.validate()?;
    info!(beams = records.len(), profile = %profile.name, "building reinforcement schedule");

    let entries: Vec<ScheduleEntry> = records
        .par_iter()
        .map(|record| match pipeline::calculate(record, profile) {
            Ok(design) => ScheduleEntry::Designed(ScheduleRow::from_design(&design)),
            Err(error) => {
                warn!(story = %record.story, element = %record.element_id, %error, "beam could not be designed");
                ScheduleEntry::Failed {
                    story: record.story.clone(),
                    element_id: record.element_id.clone(),
                    error,
                }
            }
        })
        .collect();

    let schedule = Schedule {
        meta,
        profile: profile.clone(),
        entries,
    };
    info!(
        designed = schedule.rows().count(),
        failed = schedule.failed_count(),
        "schedule complete"
    );
    Ok(schedule)
}
