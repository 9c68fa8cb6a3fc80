use super::super::distribution::TaskTypeCounts;
use super::super::domain::{group_in_encounter_order, saturation_pct, TimesheetDataset};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Per-member figures fed into a summary prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub name: String,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_hours: f64,
    pub active_days: usize,
    pub avg_saturation: f64,
    pub task_types: TaskTypeCounts,
}

impl MemberStats {
    /// One entry per member in order of first appearance. Saturation divides
    /// by the days the member logged, unlike the report's daily average.
    pub fn partition(dataset: &TimesheetDataset) -> Vec<Self> {
        group_in_encounter_order(dataset.entries(), |entry| entry.member.as_str())
            .into_iter()
            .map(|(member, entries)| {
                let total_hours: f64 = entries.iter().map(|entry| entry.actual_hours).sum();
                let active_days = entries
                    .iter()
                    .map(|entry| entry.date)
                    .collect::<BTreeSet<NaiveDate>>()
                    .len();

                MemberStats {
                    name: member.to_string(),
                    total_tasks: entries.len(),
                    completed_tasks: entries.iter().filter(|entry| entry.is_completed()).count(),
                    total_hours,
                    active_days,
                    avg_saturation: saturation_pct(total_hours, active_days),
                    task_types: TaskTypeCounts::tally(
                        entries.iter().map(|entry| entry.task_type.as_str()),
                    ),
                }
            })
            .collect()
    }
}
