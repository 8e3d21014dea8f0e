//! # File I/O
//!
//! Reading beam records and writing schedules:
//! - **Atomic saves**: write to `.tmp`, re-parse it, then rename over the target
//! - **Version validation**: refuse schedule files from a newer schema
//!
//! Beam records are a JSON array of [`BeamRecord`]; schedules are the JSON
//! form of [`Schedule`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use rebar_core::file_io::{load_beam_records, save_schedule};
//! use rebar_core::profile::DesignCodeProfile;
//! use rebar_core::schedule::{build_schedule, ScheduleMetadata};
//! use std::path::Path;
//!
//! let records = load_beam_records(Path::new("beams.json"))?;
//! let profile = DesignCodeProfile::aci_318_19();
//! let schedule = build_schedule(&records, &profile, ScheduleMetadata::new("Engineer", "25-001", &profile))?;
//! save_schedule(&schedule, Path::new("schedule.json"))?;
//! # Ok::<(), rebar_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::record::BeamRecord;
use crate::schedule::{Schedule, SCHEMA_VERSION};

fn read_to_string(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Load beam records from a JSON array.
///
/// Records are parsed but not validated; validation happens per beam when the
/// schedule is built so one bad record does not hide the rest.
pub fn load_beam_records(path: &Path) -> CalcResult<Vec<BeamRecord>> {
    let contents = read_to_string(path)?;
    let records: Vec<BeamRecord> = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid beam records in {}: {}", path.display(), e),
    })?;
    info!(path = %path.display(), count = records.len(), "loaded beam records");
    Ok(records)
}

/// Save a schedule with an atomic write.
///
/// The JSON is written to `<path>.tmp`, synced, parsed back to make sure it
/// is complete, and only then renamed over `path`.
pub fn save_schedule(schedule: &Schedule, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(schedule).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| CalcError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    // Verify before replacing the previous schedule
    let written = read_to_string(&tmp_path)?;
    if let Err(e) = serde_json::from_str::<Schedule>(&written) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::SerializationError {
            reason: format!("Temp file failed verification: {}", e),
        });
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "saved schedule");
    Ok(())
}

/// Load a schedule, checking its schema version.
pub fn load_schedule(path: &Path) -> CalcResult<Schedule> {
    let contents = read_to_string(path)?;
    let schedule: Schedule = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;
    validate_version(&schedule.meta.version)?;
    Ok(schedule)
}

/// Same major version required; for 0.x the file's minor may not be newer.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Option<Vec<u32>> { v.split('.').map(|p| p.parse().ok()).collect() };

    let file_parts = parse(file_version).filter(|p| !p.is_empty()).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(|| CalcError::Internal {
        message: format!("malformed schema version {}", SCHEMA_VERSION),
    })?;

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0 {
        let file_minor = file_parts.get(1).copied().unwrap_or(0);
        let current_minor = current_parts.get(1).copied().unwrap_or(0);
        if file_minor > current_minor {
            return Err(mismatch());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::DesignCodeProfile;
    use crate::schedule::{build_schedule, ScheduleMetadata};
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("rebar_schedule_test_{}_{}.json", name, std::process::id()))
    }

    fn sample_schedule() -> Schedule {
        let profile = DesignCodeProfile::legacy();
        let records = vec![BeamRecord::new("L1", "B1", 300, 500)];
        build_schedule(&records, &profile, ScheduleMetadata::new("Test Engineer", "TEST-001", &profile)).unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        save_schedule(&sample_schedule(), &path).unwrap();

        let loaded = load_schedule(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.meta.profile_name, "Legacy");
        assert_eq!(loaded.profile, DesignCodeProfile::legacy());
        assert_eq!(loaded.rows().next().unwrap().shear_links.middle, "2L-T12@200");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_path("atomic");
        let tmp_path = path.with_extension("json.tmp");
        save_schedule(&sample_schedule(), &path).unwrap();
        assert!(!tmp_path.exists());
        assert!(path.exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_beam_records() {
        let path = temp_path("records");
        let records = vec![
            BeamRecord::new("P2", "B686", 400, 800).with_shear(959.68, 403.94, 1619.48),
            BeamRecord::new("P2", "B687", 300, 500),
        ];
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let loaded = load_beam_records(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].element_id, "B686");
        assert_eq!(loaded[1].depth_mm, 500);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_beam_records(Path::new("/nonexistent/beams.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_malformed_records() {
        let path = temp_path("malformed");
        fs::write(&path, "[{\"story\": \"L1\"}]").unwrap();
        let err = load_beam_records(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_newer_schedule_rejected_on_load() {
        let path = temp_path("newer");
        let mut schedule = sample_schedule();
        schedule.meta.version = "0.9.0".to_string();
        save_schedule(&schedule, &path).unwrap();
        let err = load_schedule(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }
}
