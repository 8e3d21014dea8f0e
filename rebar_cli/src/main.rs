//! # Rebar Schedule CLI
//!
//! Reads beam records (JSON), designs every beam under a design-code
//! profile, and prints the reinforcement schedule one storey at a time.
//!
//! ```text
//! rebar_cli --input beams.json --profile aci-318-19 --output schedule.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rebar_core::schedule::{build_schedule, Schedule, ScheduleEntry, ScheduleMetadata};
use rebar_core::{load_beam_records, save_schedule, CalcError, CalcResult, DesignCodeProfile};

#[derive(Parser, Debug)]
#[command(name = "rebar_cli", about = "ACI 318-19 beam reinforcement schedule", version)]
struct Cli {
    /// JSON array of beam records
    #[arg(short, long)]
    input: PathBuf,
    /// Built-in design-code profile
    #[arg(long, value_enum, default_value_t = ProfileArg::Aci31819)]
    profile: ProfileArg,
    /// TOML profile file (overrides --profile)
    #[arg(long)]
    profile_file: Option<PathBuf>,
    /// Write the schedule JSON here (atomic)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Responsible engineer recorded in the schedule
    #[arg(long, default_value = "")]
    engineer: String,
    /// Job number recorded in the schedule
    #[arg(long, default_value = "")]
    job: String,
    /// Print the schedule as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    #[value(name = "aci-318-19")]
    Aci31819,
    Legacy,
}

impl From<ProfileArg> for DesignCodeProfile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Aci31819 => DesignCodeProfile::aci_318_19(),
            ProfileArg::Legacy => DesignCodeProfile::legacy(),
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet {
        "rebar_core=warn,rebar_cli=warn"
    } else {
        "rebar_core=info,rebar_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn resolve_profile(cli: &Cli) -> CalcResult<DesignCodeProfile> {
    match &cli.profile_file {
        Some(path) => {
            info!(path = %path.display(), "loading design-code profile");
            DesignCodeProfile::load(path)
        }
        None => Ok(cli.profile.into()),
    }
}

fn run(cli: &Cli) -> CalcResult<Schedule> {
    let profile = resolve_profile(cli)?;
    info!(profile = %profile, "using design-code profile");

    let records = load_beam_records(&cli.input)?;
    let meta = ScheduleMetadata::new(cli.engineer.as_str(), cli.job.as_str(), &profile);
    let schedule = build_schedule(&records, &profile, meta)?;

    if let Some(output) = &cli.output {
        save_schedule(&schedule, output)?;
        info!(path = %output.display(), "schedule written");
    }
    Ok(schedule)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(schedule) => {
            if cli.json {
                match serde_json::to_string_pretty(&schedule) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_schedule(&schedule);
            }
            if schedule.failed_count() > 0 {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(e: &CalcError) {
    eprintln!("Error [{}]: {}", e.error_code(), e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

// ============================================================================
// Table output
// ============================================================================

const COLUMNS: [(&str, usize); 12] = [
    ("Beam", 8),
    ("b x h", 10),
    ("Bot L", 14),
    ("Bot M", 14),
    ("Bot R", 14),
    ("Top L", 14),
    ("Top M", 14),
    ("Top R", 14),
    ("Side face", 12),
    ("Links L", 12),
    ("Links M", 12),
    ("Links R", 12),
];

fn print_schedule(schedule: &Schedule) {
    let meta = &schedule.meta;
    println!("═══════════════════════════════════════");
    println!("  REINFORCEMENT SCHEDULE ({})", meta.profile_name);
    if !meta.job_id.is_empty() || !meta.engineer.is_empty() {
        println!("  Job {}  Engineer {}", meta.job_id, meta.engineer);
    }
    println!("  Generated {}", meta.generated.format("%Y-%m-%d %H:%M UTC"));
    println!("═══════════════════════════════════════");

    for (story, entries) in schedule.by_story() {
        println!();
        println!("Storey {}", story);
        println!("{}", header_line());
        for entry in entries {
            match entry {
                ScheduleEntry::Designed(row) => {
                    let size = format!("{}x{}", row.width_mm, row.depth_mm);
                    let cells = [
                        row.element_id.as_str(),
                        size.as_str(),
                        row.bottom.left.as_str(),
                        row.bottom.middle.as_str(),
                        row.bottom.right.as_str(),
                        row.top.left.as_str(),
                        row.top.middle.as_str(),
                        row.top.right.as_str(),
                        row.side_face.as_str(),
                        row.shear_links.left.as_str(),
                        row.shear_links.middle.as_str(),
                        row.shear_links.right.as_str(),
                    ];
                    let mut line = table_line(&cells);
                    if let Some(check) = &row.transverse_spacing_check {
                        line.push_str(&format!(" TSC:{}", check));
                    }
                    println!("{}", line);
                }
                ScheduleEntry::Failed { element_id, error, .. } => {
                    println!("{:<8} FAILED [{}] {}", element_id, error.error_code(), error);
                }
            }
        }
    }

    let failed = schedule.failed_count();
    println!();
    println!(
        "{} beams designed, {} failed",
        schedule.entries.len() - failed,
        failed
    );
}

fn header_line() -> String {
    let names: Vec<&str> = COLUMNS.iter().map(|(name, _)| *name).collect();
    table_line(&names)
}

/// Long sentinels are printed in full and push later columns right
fn table_line(cells: &[&str]) -> String {
    cells
        .iter()
        .zip(COLUMNS.iter())
        .map(|(cell, (_, width))| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["rebar_cli", "--input", "beams.json"]).unwrap();
        assert_eq!(cli.profile, ProfileArg::Aci31819);
        assert!(cli.output.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_profile_names() {
        let cli = Cli::try_parse_from(["rebar_cli", "-i", "b.json", "--profile", "legacy"]).unwrap();
        let profile: DesignCodeProfile = cli.profile.into();
        assert_eq!(profile.torsion_threshold_depth_mm, 600);
        assert!(Cli::try_parse_from(["rebar_cli", "-i", "b.json", "--profile", "eurocode"]).is_err());
    }

    #[test]
    fn test_table_line_pads_columns() {
        let line = table_line(&["B1", "300x500"]);
        assert_eq!(line, "B1       300x500");
    }
}
