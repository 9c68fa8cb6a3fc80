use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Required timesheet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Date,
    Member,
    TaskName,
    TaskType,
    EstimatedHours,
    ActualHours,
    Status,
}

impl Column {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Date,
            Self::Member,
            Self::TaskName,
            Self::TaskType,
            Self::EstimatedHours,
            Self::ActualHours,
            Self::Status,
        ]
    }

    /// Canonical header key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Member => "member",
            Self::TaskName => "taskName",
            Self::TaskType => "taskType",
            Self::EstimatedHours => "estimatedHours",
            Self::ActualHours => "actualHours",
            Self::Status => "status",
        }
    }

    /// Human-readable header, also used by the exported report.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Member => "Member",
            Self::TaskName => "Task Name",
            Self::TaskType => "Task Type",
            Self::EstimatedHours => "Estimated Hours",
            Self::ActualHours => "Actual Hours",
            Self::Status => "Status",
        }
    }
}

static HEADER_ALIASES: OnceLock<HashMap<String, Column>> = OnceLock::new();

pub(crate) fn normalize_header(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    header_aliases().get(&normalize_header(header)).copied()
}

fn header_aliases() -> &'static HashMap<String, Column> {
    HEADER_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, Column)] = &[
            ("work date", Column::Date),
            ("day", Column::Date),
            ("日期", Column::Date),
            ("team member", Column::Member),
            ("assignee", Column::Member),
            ("成员", Column::Member),
            ("task", Column::TaskName),
            ("任务名称", Column::TaskName),
            ("type", Column::TaskType),
            ("category", Column::TaskType),
            ("任务类型", Column::TaskType),
            ("estimate", Column::EstimatedHours),
            ("estimated", Column::EstimatedHours),
            ("planned hours", Column::EstimatedHours),
            ("预估工时", Column::EstimatedHours),
            ("actual", Column::ActualHours),
            ("hours", Column::ActualHours),
            ("spent hours", Column::ActualHours),
            ("实际工时", Column::ActualHours),
            ("state", Column::Status),
            ("状态", Column::Status),
        ];

        let mut map = HashMap::with_capacity(ALIASES.len() + Column::ordered().len() * 2);
        for column in Column::ordered() {
            map.insert(normalize_header(column.key()), column);
            map.insert(normalize_header(column.label()), column);
        }
        for (alias, column) in ALIASES {
            map.insert(normalize_header(alias), *column);
        }
        map
    })
}

/// Position of every required column within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnIndex {
    positions: [usize; 7],
}

impl ColumnIndex {
    /// Resolves headers, returning the keys of any columns that are absent.
    pub(crate) fn resolve(headers: &[String]) -> Result<Self, Vec<&'static str>> {
        let mut found: [Option<usize>; 7] = [None; 7];
        for (position, header) in headers.iter().enumerate() {
            if let Some(column) = column_for_header(header) {
                let slot = &mut found[column as usize];
                if slot.is_none() {
                    *slot = Some(position);
                }
            }
        }

        let missing: Vec<&'static str> = Column::ordered()
            .into_iter()
            .filter(|column| found[*column as usize].is_none())
            .map(Column::key)
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let mut positions = [0; 7];
        for (slot, position) in positions.iter_mut().zip(found) {
            *slot = position.unwrap_or_default();
        }
        Ok(Self { positions })
    }

    pub(crate) fn position(&self, column: Column) -> usize {
        self.positions[column as usize]
    }
}
