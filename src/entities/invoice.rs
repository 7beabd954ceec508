use chrono::{DateTime, Utc};

use super::{InvoiceStatus, ItemKind};
use crate::core::error::ValidationError;
use crate::core::field::{DateValue, Patch};
use crate::core::numbering::NumberedInvoice;
use crate::core::validation::validators;
use crate::dto::invoice::{CreateInvoice, CreateInvoiceItem, UpdateInvoice};

/// A bill sent to a client
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub client_id: i64,
    pub project_id: Option<i64>,
    pub invoice_number: String,
    pub amount: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub issue_date: DateValue,
    pub due_date: Option<DateValue>,
    pub sent_date: Option<DateValue>,
    pub paid_date: Option<DateValue>,
    pub notes: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

crate::impl_record!(Invoice, "invoice", unique [invoice_number]);

/// One line of an invoice
///
/// `id` is the 1-based position within the invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub hours_worked: Option<f64>,
    pub rate_per_hour: Option<f64>,
    pub amount: f64,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
}

impl InvoiceItem {
    pub fn kind(&self) -> ItemKind {
        if self.hours_worked.is_some() {
            ItemKind::Hourly
        } else {
            ItemKind::Fixed
        }
    }
}

fn build_items(items: Vec<CreateInvoiceItem>) -> Vec<InvoiceItem> {
    items
        .into_iter()
        .zip(1..)
        .map(|(item, id)| InvoiceItem {
            id,
            description: item.description,
            quantity: item.quantity,
            unit_price: item.unit_price,
            hours_worked: item.hours_worked,
            rate_per_hour: item.rate_per_hour,
            amount: item.amount,
            project_id: item.project_id,
            task_id: item.task_id,
        })
        .collect()
}

impl Invoice {
    /// Materialize a new invoice under an already chosen number
    pub fn from_create(dto: CreateInvoice, invoice_number: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            client_id: dto.client_id,
            project_id: dto.project_id,
            invoice_number,
            amount: dto.amount,
            tax: dto.tax,
            total: dto.total,
            status: dto.status,
            issue_date: dto.issue_date,
            due_date: dto.due_date,
            sent_date: dto.sent_date,
            paid_date: dto.paid_date,
            notes: dto.notes,
            items: build_items(dto.items),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update
    ///
    /// When amount or tax change without an explicit total, or total is
    /// nulled, the total is re-derived. Moving to `sent` or `paid` from
    /// another status stamps the matching date if it is still empty and the
    /// update does not set it itself.
    pub fn apply(&mut self, update: UpdateInvoice, now: DateTime<Utc>) {
        let base_changed = update.amount.is_set() || update.tax.is_set();
        let moved_to = match update.status {
            Patch::Set(status) if status != self.status => Some(status),
            _ => None,
        };
        let sent_date_given = !update.sent_date.is_unset();
        let paid_date_given = !update.paid_date.is_unset();

        update.client_id.apply_required(&mut self.client_id);
        update.project_id.apply_to(&mut self.project_id);
        update.invoice_number.apply_required(&mut self.invoice_number);
        update.amount.apply_required(&mut self.amount);
        update.tax.apply_required(&mut self.tax);
        match update.total {
            Patch::Set(total) => self.total = total,
            Patch::Null => self.total = self.amount + self.tax,
            Patch::Unset if base_changed => self.total = self.amount + self.tax,
            Patch::Unset => {}
        }
        update.status.apply_required(&mut self.status);
        update.issue_date.apply_required(&mut self.issue_date);
        update.due_date.apply_to(&mut self.due_date);
        update.sent_date.apply_to(&mut self.sent_date);
        update.paid_date.apply_to(&mut self.paid_date);
        update.notes.apply_to(&mut self.notes);
        match update.items {
            Patch::Set(items) => self.items = build_items(items),
            Patch::Null => self.items.clear(),
            Patch::Unset => {}
        }

        match moved_to {
            Some(InvoiceStatus::Sent) if !sent_date_given && self.sent_date.is_none() => {
                self.sent_date = Some(now.into());
            }
            Some(InvoiceStatus::Paid) if !paid_date_given && self.paid_date.is_none() => {
                self.paid_date = Some(now.into());
            }
            _ => {}
        }
        self.updated_at = now;
    }

    /// The due date must not precede the issue date
    pub fn validate_dates(&self) -> Result<(), ValidationError> {
        validators::ensure_not_before(
            "dueDate",
            self.due_date.as_ref(),
            Some(self.issue_date),
            "issueDate",
        )
    }
}

impl NumberedInvoice for Invoice {
    fn invoice_id(&self) -> i64 {
        self.id
    }

    fn invoice_number(&self) -> &str {
        &self.invoice_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::SpellingPolicy;
    use crate::core::validation::extractor::FromPayload;
    use serde_json::json;

    fn invoice(body: serde_json::Value) -> Invoice {
        let dto = CreateInvoice::from_payload(&body, SpellingPolicy::Reject).unwrap();
        Invoice::from_create(dto, "INV-0001".to_string(), Utc::now())
    }

    fn update(body: serde_json::Value) -> UpdateInvoice {
        UpdateInvoice::from_payload(&body, SpellingPolicy::Reject).unwrap()
    }

    #[test]
    fn test_item_ids_follow_position() {
        let inv = invoice(json!({
            "clientId": 1,
            "items": [ { "description": "a" }, { "description": "b", "hoursWorked": 1 } ]
        }));
        assert_eq!(inv.items[0].id, 1);
        assert_eq!(inv.items[1].id, 2);
        assert_eq!(inv.items[0].kind(), ItemKind::Fixed);
        assert_eq!(inv.items[1].kind(), ItemKind::Hourly);
    }

    #[test]
    fn test_total_rederived_when_amount_changes() {
        let mut inv = invoice(json!({ "clientId": 1, "amount": 100, "tax": 10 }));
        inv.apply(update(json!({ "amount": 200 })), Utc::now());
        assert_eq!(inv.total, 210.0);

        inv.apply(update(json!({ "tax": 0, "total": 150 })), Utc::now());
        assert_eq!(inv.total, 150.0);

        inv.apply(update(json!({ "notes": "late" })), Utc::now());
        assert_eq!(inv.total, 150.0);

        inv.apply(update(json!({ "total": null })), Utc::now());
        assert_eq!(inv.total, 200.0);
    }

    #[test]
    fn test_absent_fields_left_untouched() {
        let mut inv = invoice(json!({ "clientId": 1, "projectId": 3, "notes": "hello" }));
        inv.apply(update(json!({ "project_id": null })), Utc::now());
        assert_eq!(inv.project_id, None);
        assert_eq!(inv.notes.as_deref(), Some("hello"));
        assert_eq!(inv.client_id, 1);
    }

    #[test]
    fn test_status_transition_stamps_dates() {
        let mut inv = invoice(json!({ "clientId": 1 }));
        let now = Utc::now();
        inv.apply(update(json!({ "status": "Sent" })), now);
        assert_eq!(inv.status, InvoiceStatus::Sent);
        assert_eq!(inv.sent_date, Some(DateValue::from(now)));
        assert_eq!(inv.paid_date, None);

        inv.apply(update(json!({ "status": "paid", "paidDate": "2024-06-01" })), now);
        assert_eq!(inv.paid_date, Some("2024-06-01".parse().unwrap()));
    }

    #[test]
    fn test_dates_only_stamped_on_status_change() {
        let mut inv = invoice(json!({ "clientId": 1, "status": "sent", "sentDate": "2024-05-01" }));

        inv.apply(update(json!({ "sentDate": null })), Utc::now());
        assert_eq!(inv.sent_date, None);

        inv.apply(update(json!({ "notes": "resent by mail" })), Utc::now());
        assert_eq!(inv.sent_date, None);

        inv.apply(update(json!({ "status": "sent" })), Utc::now());
        assert_eq!(inv.sent_date, None);

        inv.apply(update(json!({ "status": "paid", "paidDate": null })), Utc::now());
        assert_eq!(inv.status, InvoiceStatus::Paid);
        assert_eq!(inv.paid_date, None);
    }

    #[test]
    fn test_due_date_checked_against_stored_issue_date() {
        let mut inv = invoice(json!({ "clientId": 1, "issueDate": "2024-05-10" }));
        inv.apply(update(json!({ "dueDate": "2024-05-01" })), Utc::now());
        let err = inv.validate_dates().unwrap_err();
        assert!(err.has_field("dueDate"));

        inv.apply(update(json!({ "issueDate": "2024-04-01" })), Utc::now());
        assert!(inv.validate_dates().is_ok());
    }

    #[test]
    fn test_items_replaced_wholesale() {
        let mut inv = invoice(json!({
            "clientId": 1,
            "items": [ { "description": "a" }, { "description": "b" } ]
        }));
        inv.apply(update(json!({ "items": [ { "description": "c" } ] })), Utc::now());
        assert_eq!(inv.items.len(), 1);
        assert_eq!(inv.items[0].description, "c");
        assert_eq!(inv.items[0].id, 1);
    }
}
