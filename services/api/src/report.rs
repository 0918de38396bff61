use crate::cli::DataArgs;
use crate::infra::{load_service, merge_data_args};
use clap::Args;
use exed_clearance::config::AppConfig;
use exed_clearance::electives::{ClearanceService, ClearanceView, Gender, Grade};
use exed_clearance::error::AppError;
use exed_clearance::telemetry;

#[derive(Args, Debug)]
pub(crate) struct PriceReportArgs {
    /// Course code to price (defaults to every course)
    #[arg(long)]
    pub(crate) course: Option<String>,
    /// Emit JSON instead of a text table
    #[arg(long)]
    pub(crate) json: bool,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

pub(crate) fn run_price_report(args: PriceReportArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    config.data = merge_data_args(config.data, args.data);
    telemetry::init(&config.telemetry)?;

    let service = load_service(&config.data)?;
    let views = collect_views(&service, args.course.as_deref())?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&views)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        for view in &views {
            print!("{}", render_table(view));
        }
    }
    Ok(())
}

fn collect_views(
    service: &ClearanceService,
    course: Option<&str>,
) -> Result<Vec<ClearanceView>, AppError> {
    let codes: Vec<String> = match course {
        Some(code) => vec![code.to_string()],
        None => service
            .courses()
            .into_iter()
            .map(|summary| summary.code)
            .collect(),
    };

    codes
        .iter()
        .map(|code| service.clearance(code).map_err(AppError::from))
        .collect()
}

pub(crate) fn render_table(view: &ClearanceView) -> String {
    let mut out = format!(
        "{} ({}) - {}: {}/{} seats filled, {} bids\n",
        view.course.name,
        view.course.code,
        view.course.instructor,
        view.course.occupants,
        view.course.total_capacity,
        view.course.bids,
    );
    out.push_str(&format!(
        "{:<10} {:>12} {:>12}\n",
        "Grade",
        Gender::Male.label(),
        Gender::Female.label()
    ));

    for grade in Grade::ordered() {
        let cell = |gender: Gender| {
            view.prices
                .get(&grade)
                .and_then(|by_gender| by_gender.get(&gender))
                .map(|price| price.to_string())
                .unwrap_or_else(|| "-".to_string())
        };
        out.push_str(&format!(
            "{:<10} {:>12} {:>12}\n",
            grade.label(),
            cell(Gender::Male),
            cell(Gender::Female)
        ));
    }
    out.push('\n');
    out
}
