//! Keyword enums shared by DTOs and entities

use serde::Serialize;

crate::keyword_enum! {
    /// Billing state of an invoice
    InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
    default Draft
}

crate::keyword_enum! {
    /// Lifecycle of a project
    ProjectStatus {
        Active => "active",
        OnHold => "on_hold",
        Completed => "completed",
        Cancelled => "cancelled",
    }
    default Active
}

crate::keyword_enum! {
    /// Workflow state of a task
    TaskStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
    default Pending
}

crate::keyword_enum! {
    TaskPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
    default Medium
}

/// How an invoice line is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Billed by hours worked
    Hourly,
    /// Billed by quantity and unit price
    Fixed,
}
