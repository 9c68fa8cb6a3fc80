use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

/// Nominal working day used by every saturation figure.
pub const HOURS_PER_DAY: f64 = 8.0;

/// Label substituted for a missing task type.
pub const DEFAULT_TASK_TYPE: &str = "Uncategorized";

/// Status value counted as a completed task.
pub const COMPLETED_STATUS: &str = "Completed";

/// One normalized timesheet row: a member's work on a task for a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub date: NaiveDate,
    pub member: String,
    pub task_name: String,
    pub task_type: String,
    pub estimated_hours: f64,
    pub actual_hours: f64,
    pub status: String,
}

impl TimeEntry {
    pub fn is_completed(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(COMPLETED_STATUS)
    }

    pub fn iso_date(&self) -> String {
        iso_date(self.date)
    }
}

/// Validated entries for a single analysis request.
///
/// Only [`RecordNormalizer`](super::normalizer::RecordNormalizer) builds one, so
/// every aggregate can assume the invariants of [`TimeEntry`] hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimesheetDataset {
    entries: Vec<TimeEntry>,
}

impl TimesheetDataset {
    pub(crate) fn new(entries: Vec<TimeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TimeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.entries.iter().map(|entry| entry.date).collect()
    }

    pub fn distinct_members(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.member.as_str())
            .collect()
    }
}

pub fn saturation_pct(hours: f64, days: usize) -> f64 {
    if days == 0 {
        return 0.0;
    }
    hours / (days as f64 * HOURS_PER_DAY) * 100.0
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Groups items by key, preserving the order in which keys first appear.
pub(crate) fn group_in_encounter_order<'a, K, T, F>(
    items: &'a [T],
    mut key: F,
) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    for item in items {
        let item_key = key(item);
        match index.get(&item_key) {
            Some(&position) => groups[position].1.push(item),
            None => {
                index.insert(item_key.clone(), groups.len());
                groups.push((item_key, vec![item]));
            }
        }
    }
    groups
}
