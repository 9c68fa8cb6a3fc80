use super::domain::TimesheetDataset;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Task-type tally keyed in first-encounter order; serializes as a JSON object.
#[derive(Debug, Clone, Default)]
pub struct TaskTypeCounts {
    counts: Vec<(String, usize)>,
    // label -> slot in `counts`
    index: HashMap<String, usize>,
}

impl PartialEq for TaskTypeCounts {
    fn eq(&self, other: &Self) -> bool {
        self.counts == other.counts
    }
}

impl Eq for TaskTypeCounts {}

impl TaskTypeCounts {
    pub fn tally<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally = Self::default();
        for label in labels {
            match tally.index.get(label) {
                Some(&slot) => tally.counts[slot].1 += 1,
                None => {
                    tally.index.insert(label.to_string(), tally.counts.len());
                    tally.counts.push((label.to_string(), 1));
                }
            }
        }
        tally
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.index.get(label).map(|&slot| self.counts[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for TaskTypeCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (label, count) in &self.counts {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

pub struct TaskTypeDistribution;

impl TaskTypeDistribution {
    pub fn tally(dataset: &TimesheetDataset) -> TaskTypeCounts {
        TaskTypeCounts::tally(dataset.entries().iter().map(|entry| entry.task_type.as_str()))
    }
}
