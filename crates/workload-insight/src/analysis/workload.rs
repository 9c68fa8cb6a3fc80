use super::domain::{iso_date, saturation_pct, TimesheetDataset};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Saturation series of one member, aligned to [`WorkloadMatrix::dates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSaturation {
    pub name: String,
    pub saturation: Vec<f64>,
}

/// Dense member-by-day saturation matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkloadMatrix {
    pub dates: Vec<String>,
    pub members: Vec<MemberSaturation>,
}

pub struct WorkloadAggregator;

impl WorkloadAggregator {
    /// Sums actual hours per (date, member) and converts each day to a
    /// percentage of an eight hour day. Member-days without entries are `0`.
    pub fn aggregate(dataset: &TimesheetDataset) -> WorkloadMatrix {
        let mut daily_hours: HashMap<(NaiveDate, &str), f64> = HashMap::new();
        for entry in dataset.entries() {
            *daily_hours
                .entry((entry.date, entry.member.as_str()))
                .or_insert(0.0) += entry.actual_hours;
        }

        let dates: Vec<NaiveDate> = dataset.distinct_dates().into_iter().collect();
        let members = dataset
            .distinct_members()
            .into_iter()
            .map(|member| MemberSaturation {
                name: member.to_string(),
                saturation: dates
                    .iter()
                    .map(|date| {
                        daily_hours
                            .get(&(*date, member))
                            .map_or(0.0, |hours| saturation_pct(*hours, 1))
                    })
                    .collect(),
            })
            .collect();

        WorkloadMatrix {
            dates: dates.into_iter().map(iso_date).collect(),
            members,
        }
    }
}
