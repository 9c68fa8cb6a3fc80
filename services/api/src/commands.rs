use crate::infra::build_analyzer;
use clap::Args;
use std::path::{Path, PathBuf};
use workload_insight::analysis::{
    AnalysisBundle, AnalysisOptions, ResponseEnvelope, SpreadsheetUpload,
};
use workload_insight::config::AppConfig;
use workload_insight::error::AppError;
use workload_insight::telemetry;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Timesheet to analyse (.xlsx, .xls, .ods or .csv)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Skip the per-member narrative summaries
    #[arg(long)]
    pub(crate) skip_summaries: bool,
    /// Print the JSON response envelope instead of the readable digest
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Timesheet to build the report from
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination .xlsx file
    #[arg(long)]
    pub(crate) output: PathBuf,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        input,
        skip_summaries,
        json,
    } = args;

    let config = cli_config()?;
    let analyzer = build_analyzer(&config.summary)?;
    let upload = load_upload(&input)?;
    let bundle = analyzer
        .analyze(
            &upload,
            AnalysisOptions {
                include_summaries: !skip_summaries,
            },
        )
        .await?;

    if json {
        let envelope = ResponseEnvelope::success(bundle, "analysis complete");
        match serde_json::to_string_pretty(&envelope) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("JSON payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_digest(&input, &bundle));
    }

    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { input, output } = args;

    let config = cli_config()?;
    let analyzer = build_analyzer(&config.summary)?;
    let upload = load_upload(&input)?;
    let bytes = analyzer.report(Some(&upload))?;
    std::fs::write(&output, &bytes)?;

    println!(
        "Workload report written to {} ({} bytes)",
        output.display(),
        bytes.len()
    );
    Ok(())
}

/// Loads configuration and logs to stderr; stdout is reserved for output.
fn cli_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_writer(&config.telemetry, std::io::stderr)?;
    Ok(config)
}

fn load_upload(path: &Path) -> Result<SpreadsheetUpload, AppError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(SpreadsheetUpload::new(file_name, bytes))
}

pub(crate) fn render_digest(input: &Path, bundle: &AnalysisBundle) -> String {
    let mut out = String::new();
    out.push_str(&format!("Workload digest for {}\n", input.display()));

    let dates = &bundle.workload.dates;
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Dates: {first} -> {last} ({} day(s) with entries)\n",
            dates.len()
        )),
        _ => out.push_str("Dates: none\n"),
    }

    out.push_str("\nDaily saturation by member:\n");
    for member in &bundle.workload.members {
        let days = member.saturation.len().max(1) as f64;
        let mean = member.saturation.iter().sum::<f64>() / days;
        let peak = member.saturation.iter().copied().fold(0.0_f64, f64::max);
        out.push_str(&format!(
            "  - {}: mean {:.1}% | peak {:.1}%\n",
            member.name, mean, peak
        ));
    }

    out.push_str("\nEstimated vs actual hours:\n");
    let variance = &bundle.time_variance;
    for ((task, estimated), actual) in variance
        .tasks
        .iter()
        .zip(&variance.estimated)
        .zip(&variance.actual)
    {
        out.push_str(&format!(
            "  - {task}: {estimated:.1}h estimated | {actual:.1}h actual | {:+.1}h\n",
            actual - estimated
        ));
    }

    out.push_str("\nTask types:\n");
    for (task_type, count) in bundle.task_types.iter() {
        out.push_str(&format!("  - {task_type}: {count}\n"));
    }

    if !bundle.personal_summaries.is_empty() {
        out.push_str("\nPersonal summaries:\n");
        for summary in &bundle.personal_summaries {
            out.push_str(&format!("  {}:\n", summary.name));
            for line in summary.content.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }

    out
}
