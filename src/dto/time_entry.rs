//! Time entry request and response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NameLookup;
use crate::core::field::{DateValue, FieldReader, Patch};
use crate::core::validation::{extractor::FromPayload, validators};
use crate::entities::TimeEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTimeEntry {
    pub task_id: i64,
    pub project_id: Option<i64>,
    pub description: Option<String>,
    pub start_time: DateValue,
    pub end_time: Option<DateValue>,
    pub duration: Option<f64>,
    pub is_billable: bool,
}

impl FromPayload for CreateTimeEntry {
    const NAME: &'static str = "CreateTimeEntry";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let task_id = r.id("taskId", "task_id");
        let task_id = r.require("taskId", task_id).unwrap_or_default();
        let start_time = r
            .date("startTime", "start_time")
            .into_option()
            .unwrap_or_else(|| DateValue::from(r.now()));
        let end_time = r.date("endTime", "end_time").into_option();
        r.check(
            "endTime",
            end_time.as_ref(),
            validators::not_before(Some(start_time), "startTime"),
        );
        let duration = r.number("duration", "duration").into_option();
        r.check("duration", duration.as_ref(), validators::non_negative());

        Self {
            task_id,
            project_id: r.id("projectId", "project_id").into_option(),
            description: r.text("description", "description").into_option(),
            start_time,
            end_time,
            duration,
            is_billable: r.flag("isBillable", "is_billable").into_option().unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeEntry {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub task_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub project_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub start_time: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub end_time: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub duration: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub is_billable: Patch<bool>,
}

impl FromPayload for UpdateTimeEntry {
    const NAME: &'static str = "UpdateTimeEntry";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let task_id = r.id("taskId", "task_id");
        let task_id = r.forbid_null("taskId", task_id);
        let start_time = r.date("startTime", "start_time");
        let start_time = r.forbid_null("startTime", start_time);
        let end_time = r.date("endTime", "end_time");
        r.check(
            "endTime",
            end_time.as_ref().into_option(),
            validators::not_before(start_time.clone().into_option(), "startTime"),
        );
        let duration = r.number("duration", "duration");
        r.check(
            "duration",
            duration.as_ref().into_option(),
            validators::non_negative(),
        );
        let is_billable = r.flag("isBillable", "is_billable");
        let is_billable = r.forbid_null("isBillable", is_billable);

        Self {
            task_id,
            project_id: r.id("projectId", "project_id"),
            description: r.text("description", "description"),
            start_time,
            end_time,
            duration,
            is_billable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntryResponse {
    pub id: i64,
    pub task_id: i64,
    pub task_name: Option<String>,
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub start_time: DateValue,
    pub end_time: Option<DateValue>,
    pub duration: Option<f64>,
    pub is_billable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeEntryResponse {
    pub fn from_entity(entry: &TimeEntry, names: &impl NameLookup) -> Self {
        Self {
            id: entry.id,
            task_id: entry.task_id,
            task_name: names.task_name(entry.task_id),
            project_id: entry.project_id,
            project_name: entry.project_id.and_then(|id| names.project_name(id)),
            description: entry.description.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            duration: entry.duration,
            is_billable: entry.is_billable,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
