use chrono::{Local, NaiveDate};
use clap::Parser;
use dexa_core::cli::{setup_logging, Cli, OutputFormat};
use dexa_core::{
    BenchmarkReport, BenchmarkView, DashboardConfig, Dataset, DexaError, OverviewReport,
    PatientOverview,
};
use log::{error, info, warn};
use serde::Serialize;
use std::fmt;
use std::process;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match cli.data.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let dataset = Dataset::load(&config.paths, &config);
    let today = Local::now().date_naive();
    let report = build_report(&dataset, cli.patient.clone(), today, &config);

    match cli.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize to JSON: {}", e);
                eprintln!("Error: Failed to serialize to JSON: {}", e);
                process::exit(1);
            }
        },
    }
}

/// One report section, or the message shown in its place
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Section<T> {
    Ready(T),
    Unavailable(&'static str),
}

impl<T> Section<T> {
    fn from_result(result: dexa_core::Result<T>, name: &str) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(e) => {
                warn!("{} unavailable: {}", name, e);
                Section::Unavailable(e.user_message())
            }
        }
    }
}

/// Overview and benchmark sections for one patient
#[derive(Debug, Serialize)]
struct DashboardReport {
    patient: Option<String>,
    overview: Section<PatientOverview>,
    benchmark: Section<BenchmarkView>,
}

/// Builds every section independently; a failed section never hides the others
fn build_report(
    dataset: &Dataset,
    patient: Option<String>,
    today: NaiveDate,
    config: &DashboardConfig,
) -> DashboardReport {
    let Some(patient) = patient.or_else(|| dataset.default_patient()) else {
        warn!("No patients found in scan data");
        let message = DexaError::NoData(String::new()).user_message();
        return DashboardReport {
            patient: None,
            overview: Section::Unavailable(message),
            benchmark: Section::Unavailable(message),
        };
    };
    info!("Reporting on patient: {}", patient);

    let overview = Section::from_result(
        PatientOverview::build(dataset, &patient, today, config),
        "Overview",
    );
    let benchmark = Section::from_result(
        BenchmarkView::build(&dataset.benchmarks_for(&patient), &patient, config.band_pct),
        "Benchmark",
    );

    DashboardReport {
        patient: Some(patient),
        overview,
        benchmark,
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.overview {
            Section::Ready(overview) => writeln!(f, "{}", OverviewReport::new(overview))?,
            Section::Unavailable(message) => writeln!(f, "Patient Overview: {}\n", message)?,
        }
        match &self.benchmark {
            Section::Ready(view) => write!(f, "{}", BenchmarkReport::new(view)),
            Section::Unavailable(message) => writeln!(f, "Fat Mass Benchmark: {}", message),
        }
    }
}
