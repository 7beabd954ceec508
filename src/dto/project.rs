//! Project request and response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::field::{DateValue, FieldReader, Patch};
use crate::core::validation::{extractor::FromPayload, validators};
use crate::entities::{Project, ProjectStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateProject {
    pub client_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: Option<DateValue>,
    pub end_date: Option<DateValue>,
}

impl FromPayload for CreateProject {
    const NAME: &'static str = "CreateProject";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let name = r.text("name", "name");
        let name = r.require_text("name", name).unwrap_or_default();
        let start_date = r.date("startDate", "start_date").into_option();
        let end_date = r.date("endDate", "end_date").into_option();
        r.check(
            "endDate",
            end_date.as_ref(),
            validators::not_before(start_date, "startDate"),
        );

        Self {
            client_id: r.id("clientId", "client_id").into_option(),
            name,
            description: r.text("description", "description").into_option(),
            status: r.keyword("status", "status").into_option().unwrap_or_default(),
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub client_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub description: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<ProjectStatus>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub start_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub end_date: Patch<DateValue>,
}

impl FromPayload for UpdateProject {
    const NAME: &'static str = "UpdateProject";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let name = r.text("name", "name").blank_as_null();
        let name = r.forbid_null("name", name);
        let status = r.keyword("status", "status");
        let status = r.forbid_null("status", status);
        let start_date = r.date("startDate", "start_date");
        let end_date = r.date("endDate", "end_date");
        r.check(
            "endDate",
            end_date.as_ref().into_option(),
            validators::not_before(start_date.clone().into_option(), "startDate"),
        );

        Self {
            client_id: r.id("clientId", "client_id"),
            name,
            description: r.text("description", "description"),
            status,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResponse {
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

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            client_id: project.client_id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}
