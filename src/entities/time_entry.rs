use chrono::{DateTime, Utc};

use crate::core::error::ValidationError;
use crate::core::field::DateValue;
use crate::core::validation::validators;
use crate::dto::time_entry::{CreateTimeEntry, UpdateTimeEntry};

/// Time tracked against a task
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub task_id: i64,
    pub project_id: Option<i64>,
    pub description: Option<String>,
    pub start_time: DateValue,
    pub end_time: Option<DateValue>,
    /// Hours
    pub duration: Option<f64>,
    pub is_billable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_record!(TimeEntry, "time_entry");

impl TimeEntry {
    pub fn from_create(dto: CreateTimeEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            task_id: dto.task_id,
            project_id: dto.project_id,
            description: dto.description,
            start_time: dto.start_time,
            end_time: dto.end_time,
            duration: dto.duration,
            is_billable: dto.is_billable,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateTimeEntry, now: DateTime<Utc>) {
        update.task_id.apply_required(&mut self.task_id);
        update.project_id.apply_to(&mut self.project_id);
        update.description.apply_to(&mut self.description);
        update.start_time.apply_required(&mut self.start_time);
        update.end_time.apply_to(&mut self.end_time);
        update.duration.apply_to(&mut self.duration);
        update.is_billable.apply_required(&mut self.is_billable);
        self.updated_at = now;
    }

    /// The end time must not precede the start time
    pub fn validate_dates(&self) -> Result<(), ValidationError> {
        validators::ensure_not_before(
            "endTime",
            self.end_time.as_ref(),
            Some(self.start_time),
            "startTime",
        )
    }
}
