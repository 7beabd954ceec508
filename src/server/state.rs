//! Application state shared across handlers

use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::DeskConfig;
use crate::core::{
    DataService, InMemoryTokenStore, InvoiceNumbering, Record, SpellingPolicy, TokenStore,
    error::{DeskResult, EntityError},
};
use crate::dto::NameIndex;
use crate::entities::{Client, Invoice, Project, Task, TimeEntry};
use crate::storage::InMemoryDataService;

/// Services and settings reachable from every handler
#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn DataService<Client>>,
    pub projects: Arc<dyn DataService<Project>>,
    pub tasks: Arc<dyn DataService<Task>>,
    pub time_entries: Arc<dyn DataService<TimeEntry>>,
    pub invoices: Arc<dyn DataService<Invoice>>,
    pub numbering: Arc<InvoiceNumbering>,
    pub spelling: SpellingPolicy,
    pub csrf: Arc<dyn TokenStore>,
}

impl AppState {
    /// State backed by in-memory stores, configured from `config`
    pub fn in_memory(config: &DeskConfig) -> Self {
        Self {
            clients: Arc::new(InMemoryDataService::new()),
            projects: Arc::new(InMemoryDataService::new()),
            tasks: Arc::new(InMemoryDataService::new()),
            time_entries: Arc::new(InMemoryDataService::new()),
            invoices: Arc::new(InMemoryDataService::new()),
            numbering: Arc::new(config.numbering()),
            spelling: config.fields.spelling,
            csrf: Arc::new(InMemoryTokenStore::new(config.csrf.ttl())),
        }
    }

    /// Names of every client, project and task, for response rendering
    pub async fn name_index(&self) -> DeskResult<NameIndex> {
        let clients = self.clients.list().await?;
        let projects = self.projects.list().await?;
        let tasks = self.tasks.list().await?;

        Ok(NameIndex::new()
            .with_clients(&clients)
            .with_projects(&projects)
            .with_tasks(&tasks))
    }
}

/// Fetch a record or fail with `NotFound`
pub async fn fetch<T: Record>(service: &dyn DataService<T>, id: i64) -> DeskResult<T> {
    service.get(id).await?.ok_or_else(|| {
        EntityError::NotFound {
            entity_type: T::ENTITY.to_string(),
            id,
        }
        .into()
    })
}

/// Fail with `NotFound` unless the referenced record exists
pub async fn ensure_exists<T: Record>(
    service: &dyn DataService<T>,
    id: Option<i64>,
) -> DeskResult<()> {
    if let Some(id) = id {
        fetch(service, id).await?;
    }
    Ok(())
}

impl FromRef<AppState> for SpellingPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.spelling
    }
}

impl FromRef<AppState> for Arc<dyn TokenStore> {
    fn from_ref(state: &AppState) -> Self {
        state.csrf.clone()
    }
}
