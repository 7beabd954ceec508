//! Task request and response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NameLookup;
use crate::core::field::{DateValue, FieldReader, Patch};
use crate::core::validation::extractor::FromPayload;
use crate::entities::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTask {
    pub project_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateValue>,
    pub comments: Option<String>,
}

impl FromPayload for CreateTask {
    const NAME: &'static str = "CreateTask";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let title = r.text("title", "title");
        let title = r.require_text("title", title).unwrap_or_default();

        Self {
            project_id: r.id("projectId", "project_id").into_option(),
            title,
            description: r.text("description", "description").into_option(),
            status: r.keyword("status", "status").into_option().unwrap_or_default(),
            priority: r.keyword("priority", "priority").into_option().unwrap_or_default(),
            due_date: r.date("dueDate", "due_date").into_option(),
            comments: r.text("comments", "comments").into_option(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub project_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub title: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<TaskStatus>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub priority: Patch<TaskPriority>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub due_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub comments: Patch<String>,
}

impl FromPayload for UpdateTask {
    const NAME: &'static str = "UpdateTask";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let title = r.text("title", "title").blank_as_null();
        let title = r.forbid_null("title", title);
        let status = r.keyword("status", "status");
        let status = r.forbid_null("status", status);
        let priority = r.keyword("priority", "priority");
        let priority = r.forbid_null("priority", priority);

        Self {
            project_id: r.id("projectId", "project_id"),
            title,
            description: r.text("description", "description"),
            status,
            priority,
            due_date: r.date("dueDate", "due_date"),
            comments: r.text("comments", "comments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateValue>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn from_entity(task: &Task, names: &impl NameLookup) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            project_name: task.project_id.and_then(|id| names.project_name(id)),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            comments: task.comments.clone(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
