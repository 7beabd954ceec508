use chrono::{DateTime, Utc};

use super::ProjectStatus;
use crate::core::error::ValidationError;
use crate::core::field::DateValue;
use crate::core::validation::validators;
use crate::dto::project::{CreateProject, UpdateProject};

/// A body of work for a client
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i64,
    pub client_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_record!(Project, "project");

impl Project {
    pub fn from_create(dto: CreateProject, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            client_id: dto.client_id,
            name: dto.name,
            description: dto.description,
            status: dto.status,
            start_date: dto.start_date,
            end_date: dto.end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateProject, now: DateTime<Utc>) {
        update.client_id.apply_to(&mut self.client_id);
        update.name.apply_required(&mut self.name);
        update.description.apply_to(&mut self.description);
        update.status.apply_required(&mut self.status);
        update.start_date.apply_to(&mut self.start_date);
        update.end_date.apply_to(&mut self.end_date);
        self.updated_at = now;
    }

    /// The end date must not precede the start date
    pub fn validate_dates(&self) -> Result<(), ValidationError> {
        validators::ensure_not_before(
            "endDate",
            self.end_date.as_ref(),
            self.start_date,
            "startDate",
        )
    }
}
