use chrono::{DateTime, Utc};

use crate::dto::client::{CreateClient, UpdateClient};

/// A customer billed through invoices
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
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

crate::impl_record!(Client, "client");

impl Client {
    /// Materialize a new client; the id is assigned by the store
    pub fn from_create(dto: CreateClient, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            company: dto.company,
            address: dto.address,
            notes: dto.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: UpdateClient, now: DateTime<Utc>) {
        update.name.apply_required(&mut self.name);
        update.email.apply_to(&mut self.email);
        update.phone.apply_to(&mut self.phone);
        update.company.apply_to(&mut self.company);
        update.address.apply_to(&mut self.address);
        update.notes.apply_to(&mut self.notes);
        self.updated_at = now;
    }
}
