//! Persisted entity shapes
//!
//! Entities are materialized from Create DTOs and mutated by merging Update
//! DTOs; the store assigns ids.

pub mod macros;

pub mod client;
pub mod invoice;
pub mod project;
pub mod status;
pub mod task;
pub mod time_entry;

pub use client::Client;
pub use invoice::{Invoice, InvoiceItem};
pub use project::Project;
pub use status::{InvoiceStatus, ItemKind, ProjectStatus, TaskPriority, TaskStatus};
pub use task::Task;
pub use time_entry::TimeEntry;
