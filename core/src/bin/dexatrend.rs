use clap::Parser;
use dexa_core::cli::{setup_logging, DataArgs, OutputFormat, ToggleModeArg};
use dexa_core::{BodyPart, DashboardConfig, DashboardSession, Dataset, TrendReport, TrendView};
use log::{error, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// CLI tool for replaying body-part button clicks against the scan table
#[derive(Parser, Debug)]
#[command(name = "dexatrend")]
#[command(about = "Body-part fat/lean trends for a sequence of button clicks")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    /// Patient to report on (defaults to all patients)
    #[arg(short, long)]
    patient: Option<String>,

    /// Body-part button click, applied in order after any events file
    #[arg(long = "click", value_name = "PART")]
    clicks: Vec<BodyPart>,

    /// File of JSON events, one per line
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Toggle semantics (overrides the config file)
    #[arg(short, long)]
    mode: Option<ToggleModeArg>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = match cli.data.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if let Some(mode) = cli.mode {
        config = config.with_toggle_mode(mode.into());
    }

    let dataset = Dataset::load_shared(&config.paths, &config);
    let mut session = open_session(dataset, &config, cli.patient.clone());
    info!(
        "Session for {} in {:?} mode",
        session.patient().unwrap_or("all patients"),
        session.mode()
    );

    if let Some(path) = &cli.events {
        match replay_events(&mut session, path) {
            Ok(rejected) if rejected > 0 => warn!("{} events rejected", rejected),
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read events: {}", e);
                eprintln!("Error: Failed to read {}: {}", path.display(), e);
                process::exit(1);
            }
        }
    }

    for &part in &cli.clicks {
        session.toggle(part);
    }

    info!("Final selection: {}", session.get_selection_state());

    match session.trend_view() {
        Ok(view) => output_view(&view, cli.format),
        Err(e) => {
            warn!("No trend view: {}", e);
            println!("Selection: {}", session.get_selection_state());
            println!("{}", e.user_message());
        }
    }
}

/// Starts a session on `patient`, or on every patient when none is given
fn open_session(
    dataset: Arc<Dataset>,
    config: &DashboardConfig,
    patient: Option<String>,
) -> DashboardSession {
    let mut session = DashboardSession::new(dataset, config);
    session.set_patient(patient);
    session
}

/// Feeds every non-blank line of `path` to the session
///
/// Returns how many lines were rejected; rejected lines leave the session
/// unchanged.
fn replay_events(session: &mut DashboardSession, path: &Path) -> std::io::Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut rejected = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if session.handle_json(&line).is_err() {
            rejected += 1;
        }
    }

    Ok(rejected)
}

fn output_view(view: &TrendView, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", TrendReport::new(view)),
        OutputFormat::Json => match serde_json::to_string_pretty(view) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dexa_core::{ScanRecord, SelectionState, ToggleMode};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_dataset() -> Arc<Dataset> {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Arc::new(Dataset::new(
            vec![
                ScanRecord::new("Jane Doe", day, BodyPart::Total, 20000.0, 45000.0),
                ScanRecord::new("Jane Doe", day, BodyPart::LeftArm, 1500.0, 3000.0),
                ScanRecord::new("Amy Chen", day, BodyPart::Total, 18000.0, 41000.0),
            ],
            Vec::new(),
            Vec::new(),
        ))
    }

    fn make_session(mode: ToggleMode) -> DashboardSession {
        let config = DashboardConfig::default().with_toggle_mode(mode);
        open_session(make_dataset(), &config, Some("Jane Doe".to_string()))
    }

    #[test]
    fn test_open_session_defaults_to_all_patients() {
        let session = open_session(make_dataset(), &DashboardConfig::default(), None);
        assert_eq!(session.patient(), None);

        let view = session.trend_view().unwrap();
        assert_eq!(view.series[0].points.len(), 2);
    }

    #[test]
    fn test_open_session_with_patient() {
        let session = make_session(ToggleMode::Accumulate);
        assert_eq!(session.patient(), Some("Jane Doe"));

        let view = session.trend_view().unwrap();
        assert_eq!(view.series[0].points.len(), 1);
    }

    #[test]
    fn test_replay_events_counts_rejections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"kind":"button_click","body_part":"Left Arm"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"kind":"button_click","body_part":"Left Elbow"}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file, r#"{{"kind":"button_click","body_part":"Right Arm"}}"#).unwrap();

        let mut session = make_session(ToggleMode::Accumulate);
        let rejected = replay_events(&mut session, file.path()).unwrap();

        assert_eq!(rejected, 2);
        assert_eq!(
            session.get_selection_state(),
            &SelectionState::from_parts([BodyPart::LeftArm, BodyPart::RightArm])
        );
    }

    #[test]
    fn test_replay_events_replace_mode() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"kind":"button_click","body_part":"Left Arm"}}"#).unwrap();
        writeln!(file, r#"{{"kind":"button_click","body_part":"Right Leg"}}"#).unwrap();

        let mut session = make_session(ToggleMode::Replace);
        replay_events(&mut session, file.path()).unwrap();

        assert_eq!(
            session.get_selection_state(),
            &SelectionState::from_parts([BodyPart::RightLeg])
        );
    }

    #[test]
    fn test_replay_events_missing_file() {
        let mut session = make_session(ToggleMode::Accumulate);
        assert!(replay_events(&mut session, Path::new("/nonexistent/events.jsonl")).is_err());
        assert!(session.get_selection_state().is_total());
    }

    #[test]
    fn test_cli_parses_repeated_clicks() {
        let cli = Cli::try_parse_from([
            "dexatrend",
            "--click",
            "left_arm",
            "--click",
            "Right Arm",
            "--mode",
            "replace",
        ])
        .unwrap();

        assert_eq!(cli.clicks, vec![BodyPart::LeftArm, BodyPart::RightArm]);
        assert_eq!(cli.mode, Some(ToggleModeArg::Replace));
    }

    #[test]
    fn test_cli_rejects_unknown_part() {
        assert!(Cli::try_parse_from(["dexatrend", "--click", "left_elbow"]).is_err());
    }
}
