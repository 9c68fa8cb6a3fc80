use super::domain::{group_in_encounter_order, TimesheetDataset};
use serde::Serialize;

/// Estimated and actual hour totals per task, as three aligned sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeVariance {
    pub tasks: Vec<String>,
    pub estimated: Vec<f64>,
    pub actual: Vec<f64>,
}

impl TimeVariance {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub struct VarianceAnalyzer;

impl VarianceAnalyzer {
    /// Tasks appear in the order their name is first encountered.
    pub fn analyze(dataset: &TimesheetDataset) -> TimeVariance {
        let groups = group_in_encounter_order(dataset.entries(), |entry| entry.task_name.as_str());

        let mut variance = TimeVariance {
            tasks: Vec::with_capacity(groups.len()),
            estimated: Vec::with_capacity(groups.len()),
            actual: Vec::with_capacity(groups.len()),
        };
        for (task, entries) in groups {
            variance.tasks.push(task.to_string());
            variance
                .estimated
                .push(entries.iter().map(|entry| entry.estimated_hours).sum());
            variance
                .actual
                .push(entries.iter().map(|entry| entry.actual_hours).sum());
        }
        variance
    }
}
