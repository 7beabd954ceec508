//! Request and response DTOs
//!
//! Create DTOs are fully defaulted, Update DTOs carry only the fields the
//! caller supplied (see [`Patch`](crate::core::field::Patch)), and response
//! DTOs render entities in the snake_case wire shape.

pub mod client;
pub mod invoice;
pub mod project;
pub mod task;
pub mod time_entry;

use std::collections::HashMap;

pub use client::{ClientResponse, CreateClient, UpdateClient};
pub use invoice::{
    CreateInvoice, CreateInvoiceItem, InvoiceItemResponse, InvoiceResponse, UpdateInvoice,
};
pub use project::{CreateProject, ProjectResponse, UpdateProject};
pub use task::{CreateTask, TaskResponse, UpdateTask};
pub use time_entry::{CreateTimeEntry, TimeEntryResponse, UpdateTimeEntry};

use crate::entities::{Client, Project, Task};

/// Resolves display names for referenced entities
///
/// Lookups are informational: an unknown id renders as `None`.
pub trait NameLookup {
    fn client_name(&self, id: i64) -> Option<String>;
    fn project_name(&self, id: i64) -> Option<String>;
    fn task_name(&self, id: i64) -> Option<String>;
}

/// Snapshot of names keyed by id
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    clients: HashMap<i64, String>,
    projects: HashMap<i64, String>,
    tasks: HashMap<i64, String>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clients<'a>(mut self, clients: impl IntoIterator<Item = &'a Client>) -> Self {
        self.clients
            .extend(clients.into_iter().map(|c| (c.id, c.name.clone())));
        self
    }

    pub fn with_projects<'a>(mut self, projects: impl IntoIterator<Item = &'a Project>) -> Self {
        self.projects
            .extend(projects.into_iter().map(|p| (p.id, p.name.clone())));
        self
    }

    pub fn with_tasks<'a>(mut self, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        self.tasks
            .extend(tasks.into_iter().map(|t| (t.id, t.title.clone())));
        self
    }
}

impl NameLookup for NameIndex {
    fn client_name(&self, id: i64) -> Option<String> {
        self.clients.get(&id).cloned()
    }

    fn project_name(&self, id: i64) -> Option<String> {
        self.projects.get(&id).cloned()
    }

    fn task_name(&self, id: i64) -> Option<String> {
        self.tasks.get(&id).cloned()
    }
}
