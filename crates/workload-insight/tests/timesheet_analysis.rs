use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use serde_json::json;
use workload_insight::analysis::{
    AnalysisError, AnalysisOptions, DataFormatError, GenerationFailure, GenerationOutcome,
    NormalizeError, ResponseEnvelope, SpreadsheetUpload, SummaryPipeline, TextGenerator,
    WorkloadAnalyzer, FALLBACK_SUMMARY,
};

const HEADER: &str = "Date,Member,Task Name,Task Type,Estimated Hours,Actual Hours,Status";

/// Hangs for member A, answers for everyone else.
#[derive(Debug)]
struct StallingGenerator;

#[async_trait]
impl TextGenerator for StallingGenerator {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        if prompt.contains("team member A.") {
            std::future::pending::<()>().await;
        }
        GenerationOutcome::Generated("steady contributor".to_string())
    }
}

#[derive(Debug)]
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> GenerationOutcome {
        GenerationOutcome::Failed(GenerationFailure::Transport("connection refused".to_string()))
    }
}

fn analyzer(generator: Arc<dyn TextGenerator>, timeout: Duration) -> WorkloadAnalyzer {
    WorkloadAnalyzer::new(SummaryPipeline::with_limits(generator, timeout, 4))
}

fn csv_upload(rows: &[&str]) -> SpreadsheetUpload {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    SpreadsheetUpload::new(Some("timesheet.csv".to_string()), body.into_bytes())
}

fn two_member_upload() -> SpreadsheetUpload {
    csv_upload(&[
        "2024-01-01,A,T1,dev,4,5,Completed",
        "2024-01-01,B,T2,test,2,2,Pending",
    ])
}

#[tokio::test]
async fn two_member_scenario_produces_expected_aggregates() {
    let analyzer = analyzer(Arc::new(StallingGenerator), Duration::from_secs(1));
    let bundle = analyzer
        .analyze(
            &two_member_upload(),
            AnalysisOptions {
                include_summaries: false,
            },
        )
        .await
        .expect("analysis succeeds");

    let payload = serde_json::to_value(&bundle).expect("serializes");
    assert_eq!(
        payload,
        json!({
            "workload": {
                "dates": ["2024-01-01"],
                "members": [
                    { "name": "A", "saturation": [62.5] },
                    { "name": "B", "saturation": [25.0] },
                ],
            },
            "timeVariance": {
                "tasks": ["T1", "T2"],
                "estimated": [4.0, 2.0],
                "actual": [5.0, 2.0],
            },
            "taskTypes": { "dev": 1, "test": 1 },
            "personalSummaries": [],
        })
    );
}

#[tokio::test]
async fn timed_out_member_falls_back_while_others_succeed() {
    let analyzer = analyzer(Arc::new(StallingGenerator), Duration::from_millis(50));
    let bundle = analyzer
        .analyze(&two_member_upload(), AnalysisOptions::default())
        .await
        .expect("analysis still succeeds");

    let summaries: Vec<_> = bundle
        .personal_summaries
        .iter()
        .map(|summary| (summary.name.as_str(), summary.content.as_str()))
        .collect();
    assert_eq!(
        summaries,
        vec![("A", FALLBACK_SUMMARY), ("B", "steady contributor")]
    );

    let envelope = serde_json::to_value(ResponseEnvelope::success(bundle, "analysis complete"))
        .expect("serializes");
    assert_eq!(envelope["status"], "success");
}

#[tokio::test]
async fn every_member_gets_a_summary_even_when_all_calls_fail() {
    let analyzer = analyzer(Arc::new(FailingGenerator), Duration::from_secs(1));
    let upload = csv_upload(&[
        "2024-01-01,C,T1,dev,4,5,Completed",
        "2024-01-02,A,T2,dev,1,1,Completed",
        "2024-01-02,C,T3,ops,1,1,Pending",
        "2024-01-03,B,T4,test,2,3,Pending",
    ]);

    let bundle = analyzer
        .analyze(&upload, AnalysisOptions::default())
        .await
        .expect("analysis succeeds");

    let names: Vec<_> = bundle
        .personal_summaries
        .iter()
        .map(|summary| summary.name.as_str())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert!(bundle
        .personal_summaries
        .iter()
        .all(|summary| summary.content == FALLBACK_SUMMARY));
}

#[tokio::test]
async fn unparsable_date_fails_the_whole_analysis() {
    let analyzer = analyzer(Arc::new(FailingGenerator), Duration::from_secs(1));
    let upload = csv_upload(&[
        "2024-01-01,A,T1,dev,4,5,Completed",
        "someday,B,T2,test,2,2,Pending",
    ]);

    let err = analyzer
        .analyze(&upload, AnalysisOptions::default())
        .await
        .expect_err("bad date rejected");
    match &err {
        AnalysisError::Normalize(NormalizeError::DataFormat(format_err)) => {
            assert_eq!(format_err.row(), 3);
            assert!(matches!(format_err, DataFormatError::InvalidDate { .. }));
        }
        other => panic!("expected data format error, got {other:?}"),
    }
    assert_eq!(err.status_code(), 422);

    let report = analyzer.report(Some(&upload)).expect_err("no report either");
    assert!(matches!(
        report,
        AnalysisError::Normalize(NormalizeError::DataFormat(_))
    ));
}

#[tokio::test]
async fn repeated_analysis_is_identical() {
    let analyzer = analyzer(Arc::new(FailingGenerator), Duration::from_secs(1));
    let upload = csv_upload(&[
        "2024-01-02,B,T2,test,2,2.5,Pending",
        "2024-01-01,A,T1,dev,4,5,Completed",
        "2024-01-03,A,T1,dev,,3,Completed",
    ]);
    let options = AnalysisOptions {
        include_summaries: false,
    };

    let first = analyzer.analyze(&upload, options).await.expect("first run");
    let second = analyzer.analyze(&upload, options).await.expect("second run");
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes")
    );

    let workload = &first.workload;
    assert_eq!(workload.dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    for member in &workload.members {
        assert_eq!(member.saturation.len(), workload.dates.len());
    }
}

#[tokio::test]
async fn xlsx_uploads_are_analysed_like_csv() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (col, header) in (0u16..).zip(HEADER.split(',')) {
        sheet.write(0, col, header).expect("header cell");
    }
    let date = ExcelDateTime::from_ymd(2024, 1, 1).expect("valid date");
    sheet
        .write_with_format(1, 0, &date, &date_format)
        .expect("date cell");
    sheet.write(1, 1, "A").expect("member");
    sheet.write(1, 2, "T1").expect("task");
    sheet.write(1, 3, "dev").expect("type");
    sheet.write(1, 4, 4).expect("estimate");
    sheet.write(1, 5, 6).expect("actual");
    sheet.write(1, 6, "Completed").expect("status");
    let bytes = workbook.save_to_buffer().expect("workbook saves");

    let analyzer = analyzer(Arc::new(FailingGenerator), Duration::from_secs(1));
    let upload = SpreadsheetUpload::new(Some("timesheet.xlsx".to_string()), bytes);
    let bundle = analyzer
        .analyze(
            &upload,
            AnalysisOptions {
                include_summaries: false,
            },
        )
        .await
        .expect("xlsx analysed");

    assert_eq!(bundle.workload.dates, vec!["2024-01-01"]);
    assert_eq!(bundle.workload.members[0].saturation, vec![75.0]);
}

#[test]
fn report_workbook_reflects_the_upload() {
    let analyzer = analyzer(Arc::new(FailingGenerator), Duration::from_secs(1));
    let bytes = analyzer
        .report(Some(&two_member_upload()))
        .expect("report renders");

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).expect("report reopens");
    let summary = workbook
        .worksheet_range("Workload Summary")
        .expect("summary sheet");
    assert_eq!(summary.get((1, 0)), Some(&Data::String("A".to_string())));
    assert_eq!(summary.get((1, 3)), Some(&Data::Float(5.0)));
    assert_eq!(summary.get((2, 0)), Some(&Data::String("B".to_string())));

    let missing = analyzer.report(None).expect_err("no upload");
    assert_eq!(missing.status_code(), 409);
}
