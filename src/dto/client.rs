//! Client request and response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::field::{FieldReader, Patch};
use crate::core::validation::{extractor::FromPayload, validators};
use crate::entities::Client;

const MAX_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl FromPayload for CreateClient {
    const NAME: &'static str = "CreateClient";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let name = r.text("name", "name");
        let name = r.require_text("name", name);
        r.check("name", name.as_ref(), validators::string_length(1, MAX_NAME_CHARS));
        let email = r.text("email", "email").blank_as_null();
        r.check("email", email.as_ref().into_option(), validators::email());

        Self {
            name: name.unwrap_or_default(),
            email: email.into_option(),
            phone: r.text("phone", "phone").blank_as_null().into_option(),
            company: r.text("company", "company").blank_as_null().into_option(),
            address: r.text("address", "address").blank_as_null().into_option(),
            notes: r.text("notes", "notes").into_option(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub email: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub phone: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub company: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub address: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<String>,
}

impl FromPayload for UpdateClient {
    const NAME: &'static str = "UpdateClient";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let name = r.text("name", "name").blank_as_null();
        let name = r.forbid_null("name", name);
        r.check(
            "name",
            name.as_ref().into_option(),
            validators::string_length(1, MAX_NAME_CHARS),
        );
        let email = r.text("email", "email").blank_as_null();
        r.check("email", email.as_ref().into_option(), validators::email());

        Self {
            name,
            email,
            phone: r.text("phone", "phone").blank_as_null(),
            company: r.text("company", "company").blank_as_null(),
            address: r.text("address", "address").blank_as_null(),
            notes: r.text("notes", "notes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Client> for ClientResponse {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            company: client.company.clone(),
            address: client.address.clone(),
            notes: client.notes.clone(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}
