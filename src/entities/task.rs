use chrono::{DateTime, Utc};

use super::{TaskPriority, TaskStatus};
use crate::core::field::DateValue;
use crate::dto::task::{CreateTask, UpdateTask};

/// A unit of work, optionally inside a project
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub project_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateValue>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_record!(Task, "task");

impl Task {
    pub fn from_create(dto: CreateTask, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            project_id: dto.project_id,
            title: dto.title,
            description: dto.description,
            status: dto.status,
            priority: dto.priority,
            due_date: dto.due_date,
            comments: dto.comments,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateTask, now: DateTime<Utc>) {
        update.project_id.apply_to(&mut self.project_id);
        update.title.apply_required(&mut self.title);
        update.description.apply_to(&mut self.description);
        update.status.apply_required(&mut self.status);
        update.priority.apply_required(&mut self.priority);
        update.due_date.apply_to(&mut self.due_date);
        update.comments.apply_to(&mut self.comments);
        self.updated_at = now;
    }
}
