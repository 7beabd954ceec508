//! # Freelance Desk
//!
//! Request normalization, DTOs and invoice numbering for a freelancer
//! business-management API, with an axum server on top.
//!
//! ## Features
//!
//! - **Dual-spelling fields**: request bodies may use `clientId` or `client_id`
//! - **Partial updates**: every Update DTO field is a [`Patch`](core::Patch)
//!   (unset, null, or a new value)
//! - **Defaults and coercion**: numeric strings become numbers, bad numbers are
//!   validation errors instead of silent zeros
//! - **Invoice numbering**: sequential `INV-0001` style numbers with an
//!   advisory existence check
//! - **Snake_case responses** with resolved project and task names
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use desk::prelude::*;
//! use serde_json::json;
//!
//! let dto = CreateInvoice::from_payload(
//!     &json!({ "client_id": 3, "amount": "100", "tax": 20 }),
//!     SpellingPolicy::Reject,
//! )?;
//! assert_eq!(dto.total, 120.0);
//!
//! ServerBuilder::new()
//!     .with_config(DeskConfig::from_yaml_file("desk.yaml")?)
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod dto;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DataService, DateValue, DeskError, DeskResult, EntityError, FieldReader, FromPayload,
        InMemoryTokenStore, InvoiceNumbering, Patch, Record, SpellingPolicy, TokenStore,
        ValidationError,
        numbering::{invoice_number_exists, next_invoice_number, validate_invoice_number},
        validation::Validated,
    };

    // === DTOs ===
    pub use crate::dto::{
        ClientResponse, CreateClient, CreateInvoice, CreateInvoiceItem, CreateProject,
        CreateTask, CreateTimeEntry, InvoiceItemResponse, InvoiceResponse, NameIndex, NameLookup,
        ProjectResponse, TaskResponse, TimeEntryResponse, UpdateClient, UpdateInvoice,
        UpdateProject, UpdateTask, UpdateTimeEntry,
    };

    // === Entities ===
    pub use crate::entities::{
        Client, Invoice, InvoiceItem, InvoiceStatus, ItemKind, Project, ProjectStatus, Task,
        TaskPriority, TaskStatus, TimeEntry,
    };

    // === Server ===
    pub use crate::config::DeskConfig;
    pub use crate::server::{AppState, ServerBuilder};
    pub use crate::storage::InMemoryDataService;
}
