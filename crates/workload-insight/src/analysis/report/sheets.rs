use super::super::domain::{group_in_encounter_order, TimesheetDataset};
use super::super::normalizer::Column;
use serde::Serialize;

/// The three report sections, in workbook order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    WorkloadSummary,
    TaskCompletion,
    DailyDetail,
}

impl ReportSection {
    pub const fn ordered() -> [Self; 3] {
        [Self::WorkloadSummary, Self::TaskCompletion, Self::DailyDetail]
    }

    pub const fn sheet_name(self) -> &'static str {
        match self {
            Self::WorkloadSummary => "Workload Summary",
            Self::TaskCompletion => "Task Completion",
            Self::DailyDetail => "Daily Detail",
        }
    }

    pub fn headers(self) -> &'static [&'static str] {
        const WORKLOAD: &[&str] = &["Member", "Task Count", "Total Hours", "Avg Daily Hours"];
        const COMPLETION: &[&str] = &[
            "Member",
            "Task Type",
            "Task Count",
            "Estimated Hours",
            "Actual Hours",
            "Hours Variance",
        ];
        const DAILY: &[&str] = &[
            Column::Date.label(),
            Column::Member.label(),
            Column::TaskName.label(),
            Column::TaskType.label(),
            Column::EstimatedHours.label(),
            Column::ActualHours.label(),
            Column::Status.label(),
        ];

        match self {
            Self::WorkloadSummary => WORKLOAD,
            Self::TaskCompletion => COMPLETION,
            Self::DailyDetail => DAILY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportCell {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadSummaryRow {
    pub member: String,
    pub task_count: usize,
    pub total_hours: f64,
    pub avg_daily_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCompletionRow {
    pub member: String,
    pub task_type: String,
    pub task_count: usize,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub hours_variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDetailRow {
    pub date: String,
    pub member: String,
    pub task_name: String,
    pub task_type: String,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSheets {
    pub workload_summary: Vec<WorkloadSummaryRow>,
    pub task_completion: Vec<TaskCompletionRow>,
    pub daily_detail: Vec<DailyDetailRow>,
}

impl ReportSheets {
    pub fn rows(&self, section: ReportSection) -> Vec<Vec<ReportCell>> {
        use ReportCell::{Number, Text};

        match section {
            ReportSection::WorkloadSummary => self
                .workload_summary
                .iter()
                .map(|row| {
                    vec![
                        Text(row.member.clone()),
                        Number(row.task_count as f64),
                        Number(row.total_hours),
                        Number(row.avg_daily_hours),
                    ]
                })
                .collect(),
            ReportSection::TaskCompletion => self
                .task_completion
                .iter()
                .map(|row| {
                    vec![
                        Text(row.member.clone()),
                        Text(row.task_type.clone()),
                        Number(row.task_count as f64),
                        Number(row.estimated_hours),
                        Number(row.actual_hours),
                        Number(row.hours_variance),
                    ]
                })
                .collect(),
            ReportSection::DailyDetail => self
                .daily_detail
                .iter()
                .map(|row| {
                    vec![
                        Text(row.date.clone()),
                        Text(row.member.clone()),
                        Text(row.task_name.clone()),
                        Text(row.task_type.clone()),
                        Number(row.estimated_hours),
                        Number(row.actual_hours),
                        Text(row.status.clone()),
                    ]
                })
                .collect(),
        }
    }
}

pub struct ReportSynthesizer;

impl ReportSynthesizer {
    pub fn synthesize(dataset: &TimesheetDataset) -> ReportSheets {
        ReportSheets {
            workload_summary: workload_summary(dataset),
            task_completion: task_completion(dataset),
            daily_detail: daily_detail(dataset),
        }
    }
}

/// Average daily hours divide by the number of distinct dates in the whole
/// dataset, not the dates a member logged.
fn workload_summary(dataset: &TimesheetDataset) -> Vec<WorkloadSummaryRow> {
    let dataset_days = dataset.distinct_dates().len();

    group_in_encounter_order(dataset.entries(), |entry| entry.member.as_str())
        .into_iter()
        .map(|(member, entries)| {
            let total_hours: f64 = entries.iter().map(|entry| entry.actual_hours).sum();
            WorkloadSummaryRow {
                member: member.to_string(),
                task_count: entries.len(),
                total_hours,
                avg_daily_hours: if dataset_days == 0 {
                    0.0
                } else {
                    total_hours / dataset_days as f64
                },
            }
        })
        .collect()
}

fn task_completion(dataset: &TimesheetDataset) -> Vec<TaskCompletionRow> {
    group_in_encounter_order(dataset.entries(), |entry| {
        (entry.member.as_str(), entry.task_type.as_str())
    })
    .into_iter()
    .map(|((member, task_type), entries)| {
        let estimated_hours: f64 = entries.iter().map(|entry| entry.estimated_hours).sum();
        let actual_hours: f64 = entries.iter().map(|entry| entry.actual_hours).sum();
        TaskCompletionRow {
            member: member.to_string(),
            task_type: task_type.to_string(),
            task_count: entries.len(),
            estimated_hours,
            actual_hours,
            hours_variance: actual_hours - estimated_hours,
        }
    })
    .collect()
}

fn daily_detail(dataset: &TimesheetDataset) -> Vec<DailyDetailRow> {
    dataset
        .entries()
        .iter()
        .map(|entry| DailyDetailRow {
            date: entry.iso_date(),
            member: entry.member.clone(),
            task_name: entry.task_name.clone(),
            task_type: entry.task_type.clone(),
            estimated_hours: entry.estimated_hours,
            actual_hours: entry.actual_hours,
            status: entry.status.clone(),
        })
        .collect()
}
