use crate::cli::DataArgs;
use exed_clearance::config::DataConfig;
use exed_clearance::electives::{ClearanceService, TracingErrorSink};
use exed_clearance::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Applies command-line path overrides on top of the environment.
pub(crate) fn merge_data_args(mut data: DataConfig, args: DataArgs) -> DataConfig {
    if args.courses.is_some() {
        data.courses_csv = args.courses;
    }
    if args.profiles.is_some() {
        data.profiles_csv = args.profiles;
    }
    if args.roster.is_some() {
        data.roster_csv = args.roster;
    }
    data
}

pub(crate) fn load_service(data: &DataConfig) -> Result<ClearanceService, AppError> {
    let (courses, profiles) = data.required_paths()?;
    let service = ClearanceService::from_paths(
        courses,
        profiles,
        data.roster_csv.as_deref(),
        &TracingErrorSink,
    )?;

    let report = service.ingest_report();
    if !report.diagnostics.is_empty() {
        warn!(
            collisions = report.diagnostics.len(),
            "profile export contains shared lottery numbers"
        );
    }
    let roster = service.roster_summary();
    info!(
        courses = service.catalog().len(),
        profiles = service.registry().count(),
        bids = roster.bids,
        placements = roster.placements,
        "clearance data loaded"
    );

    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn flags_override_environment_paths() {
        let env = DataConfig {
            courses_csv: Some(PathBuf::from("env/courses.csv")),
            profiles_csv: Some(PathBuf::from("env/profiles.csv")),
            roster_csv: None,
        };
        let args = DataArgs {
            courses: None,
            profiles: Some(PathBuf::from("cli/profiles.csv")),
            roster: Some(PathBuf::from("cli/roster.csv")),
        };

        let merged = merge_data_args(env, args);
        assert_eq!(merged.courses_csv, Some(PathBuf::from("env/courses.csv")));
        assert_eq!(merged.profiles_csv, Some(PathBuf::from("cli/profiles.csv")));
        assert_eq!(merged.roster_csv, Some(PathBuf::from("cli/roster.csv")));
    }

    #[test]
    fn load_service_requires_course_and_profile_paths() {
        let result = load_service(&DataConfig::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
