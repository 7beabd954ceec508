//! Invoice request and response DTOs
//!
//! `total` is either supplied by the caller or derived as `amount + tax`.
//! Line items carry their own amount, derived from hours and rate for hourly
//! work and from quantity and unit price otherwise.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::NameLookup;
use crate::core::field::{DateValue, FieldReader, Patch};
use crate::core::numbering;
use crate::core::validation::{extractor::FromPayload, filters, validators};
use crate::entities::{Invoice, InvoiceItem, InvoiceStatus, ItemKind};

/// Line item as read from a create or update body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub hours_worked: Option<f64>,
    pub rate_per_hour: Option<f64>,
    pub amount: f64,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
}

impl CreateInvoiceItem {
    pub fn read(r: &mut FieldReader<'_>) -> Self {
        let description = r.text("description", "description");
        let description = r.require_text("description", description).unwrap_or_default();

        let quantity = r.number("quantity", "quantity").into_option().unwrap_or(1.0);
        r.check("quantity", Some(&quantity), validators::non_negative());
        let unit_price = r.number("unitPrice", "unit_price").into_option().unwrap_or(0.0);
        r.check("unitPrice", Some(&unit_price), validators::non_negative());
        let hours_worked = r.number("hoursWorked", "hours_worked").into_option();
        r.check("hoursWorked", hours_worked.as_ref(), validators::non_negative());
        let rate_per_hour = r.number("ratePerHour", "rate_per_hour").into_option();
        r.check("ratePerHour", rate_per_hour.as_ref(), validators::non_negative());

        let amount = r
            .number("amount", "amount")
            .into_option()
            .unwrap_or_else(|| line_amount(quantity, unit_price, hours_worked, rate_per_hour));

        Self {
            description,
            quantity,
            unit_price,
            hours_worked,
            rate_per_hour,
            amount,
            project_id: r.id("projectId", "project_id").into_option(),
            task_id: r.id("taskId", "task_id").into_option(),
        }
    }
}

/// Amount of a line item when the caller did not supply one
pub fn line_amount(
    quantity: f64,
    unit_price: f64,
    hours_worked: Option<f64>,
    rate_per_hour: Option<f64>,
) -> f64 {
    let raw = match hours_worked {
        Some(hours) => hours * rate_per_hour.unwrap_or(0.0),
        None => quantity * unit_price,
    };
    filters::round_decimals(raw, 2)
}

fn read_invoice_number(r: &mut FieldReader<'_>) -> Patch<String> {
    let number = r.text("invoiceNumber", "invoice_number").blank_as_null();
    r.check(
        "invoiceNumber",
        number.as_ref().into_option(),
        |_: &str, value: &String| numbering::validate_invoice_number(value),
    );
    number
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateInvoice {
    pub client_id: i64,
    pub project_id: Option<i64>,
    /// `None` asks the server to issue the next number
    pub invoice_number: Option<String>,
    pub amount: f64,
    pub tax: f64,
    pub total: f64,
    pub status: InvoiceStatus,
    pub issue_date: DateValue,
    pub due_date: Option<DateValue>,
    pub sent_date: Option<DateValue>,
    pub paid_date: Option<DateValue>,
    pub notes: Option<String>,
    pub items: Vec<CreateInvoiceItem>,
}

impl FromPayload for CreateInvoice {
    const NAME: &'static str = "CreateInvoice";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let client_id = r.id("clientId", "client_id");
        let client_id = r.require("clientId", client_id).unwrap_or_default();
        let invoice_number = read_invoice_number(r).into_option();

        let amount = r.number("amount", "amount").into_option().unwrap_or(0.0);
        r.check("amount", Some(&amount), validators::non_negative());
        let tax = r.number("tax", "tax").into_option().unwrap_or(0.0);
        r.check("tax", Some(&tax), validators::non_negative());
        let total = r
            .number("total", "total")
            .into_option()
            .unwrap_or(amount + tax);

        let issue_date = r
            .date("issueDate", "issue_date")
            .into_option()
            .unwrap_or_else(|| DateValue::from(r.now()));
        let due_date = r.date("dueDate", "due_date").into_option();
        r.check(
            "dueDate",
            due_date.as_ref(),
            validators::not_before(Some(issue_date), "issueDate"),
        );

        Self {
            client_id,
            project_id: r.id("projectId", "project_id").into_option(),
            invoice_number,
            amount,
            tax,
            total,
            status: r.keyword("status", "status").into_option().unwrap_or_default(),
            issue_date,
            due_date,
            sent_date: r.date("sentDate", "sent_date").into_option(),
            paid_date: r.date("paidDate", "paid_date").into_option(),
            notes: r.text("notes", "notes").into_option(),
            items: r
                .objects("items", "items", CreateInvoiceItem::read)
                .into_option()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoice {
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub client_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub project_id: Patch<i64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub invoice_number: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub amount: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub tax: Patch<f64>,
    /// `Null` re-derives the total from amount and tax
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub total: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub status: Patch<InvoiceStatus>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub issue_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub due_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub sent_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub paid_date: Patch<DateValue>,
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub notes: Patch<String>,
    /// Replaces the whole list when set
    #[serde(skip_serializing_if = "Patch::is_unset")]
    pub items: Patch<Vec<CreateInvoiceItem>>,
}

impl FromPayload for UpdateInvoice {
    const NAME: &'static str = "UpdateInvoice";

    fn read(r: &mut FieldReader<'_>) -> Self {
        let client_id = r.id("clientId", "client_id");
        let client_id = r.forbid_null("clientId", client_id);
        let invoice_number = read_invoice_number(r);
        let invoice_number = r.forbid_null("invoiceNumber", invoice_number);

        let amount = r.number("amount", "amount");
        let amount = r.forbid_null("amount", amount);
        r.check("amount", amount.as_ref().into_option(), validators::non_negative());
        let tax = r.number("tax", "tax");
        let tax = r.forbid_null("tax", tax);
        r.check("tax", tax.as_ref().into_option(), validators::non_negative());

        let status = r.keyword("status", "status");
        let status = r.forbid_null("status", status);
        let issue_date = r.date("issueDate", "issue_date");
        let issue_date = r.forbid_null("issueDate", issue_date);

        Self {
            client_id,
            project_id: r.id("projectId", "project_id"),
            invoice_number,
            amount,
            tax,
            total: r.number("total", "total"),
            status,
            issue_date,
            due_date: r.date("dueDate", "due_date"),
            sent_date: r.date("sentDate", "sent_date"),
            paid_date: r.date("paidDate", "paid_date"),
            notes: r.text("notes", "notes"),
            items: r.objects("items", "items", CreateInvoiceItem::read),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItemResponse {
    pub id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub hours_worked: Option<f64>,
    pub rate_per_hour: Option<f64>,
    pub amount: f64,
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
    pub task_id: Option<i64>,
    pub task_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl InvoiceItemResponse {
    pub fn from_entity(item: &InvoiceItem, names: &impl NameLookup) -> Self {
        Self {
            id: item.id,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            hours_worked: item.hours_worked,
            rate_per_hour: item.rate_per_hour,
            amount: item.amount,
            project_id: item.project_id,
            project_name: item.project_id.and_then(|id| names.project_name(id)),
            task_id: item.task_id,
            task_name: item.task_id.and_then(|id| names.task_name(id)),
            kind: item.kind(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceResponse {
    pub id: i64,
    pub client_id: i64,
    pub client_name: Option<String>,
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
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
    pub items: Vec<InvoiceItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceResponse {
    pub fn from_entity(invoice: &Invoice, names: &impl NameLookup) -> Self {
        Self {
            id: invoice.id,
            client_id: invoice.client_id,
            client_name: names.client_name(invoice.client_id),
            project_id: invoice.project_id,
            project_name: invoice.project_id.and_then(|id| names.project_name(id)),
            invoice_number: invoice.invoice_number.clone(),
            amount: invoice.amount,
            tax: invoice.tax,
            total: invoice.total,
            status: invoice.status,
            issue_date: invoice.issue_date,
            due_date: invoice.due_date,
            sent_date: invoice.sent_date,
            paid_date: invoice.paid_date,
            notes: invoice.notes.clone(),
            items: invoice
                .items
                .iter()
                .map(|item| InvoiceItemResponse::from_entity(item, names))
                .collect(),
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::SpellingPolicy;
    use serde_json::json;

    fn create(body: serde_json::Value) -> CreateInvoice {
        CreateInvoice::from_payload(&body, SpellingPolicy::Reject).unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let dto = create(json!({ "client_id": 4 }));
        assert_eq!(dto.client_id, 4);
        assert_eq!(dto.amount, 0.0);
        assert_eq!(dto.tax, 0.0);
        assert_eq!(dto.total, 0.0);
        assert_eq!(dto.status, InvoiceStatus::Draft);
        assert!(matches!(dto.issue_date, DateValue::DateTime(_)));
        assert!(dto.items.is_empty());
        assert_eq!(dto.invoice_number, None);
    }

    #[test]
    fn test_total_derived_unless_supplied() {
        let dto = create(json!({ "clientId": 1, "amount": "100.5", "tax": 20 }));
        assert_eq!(dto.total, 120.5);

        let dto = create(json!({ "clientId": 1, "amount": 100, "tax": 20, "total": 99 }));
        assert_eq!(dto.total, 99.0);
    }

    #[test]
    fn test_missing_client_and_bad_amount_reported_together() {
        let err = CreateInvoice::from_payload(
            &json!({ "amount": "lots", "invoiceNumber": "inv 7" }),
            SpellingPolicy::Reject,
        )
        .unwrap_err();
        assert!(err.has_field("clientId"));
        assert!(err.has_field("amount"));
        assert!(err.has_field("invoiceNumber"));
    }

    #[test]
    fn test_item_amount_and_kind() {
        let dto = create(json!({
            "clientId": 1,
            "items": [
                { "description": "Design", "hours_worked": "2.5", "ratePerHour": 80 },
                { "description": "Hosting", "quantity": 3, "unit_price": "9.99" },
                { "description": "Flat fee", "amount": 50 }
            ]
        }));
        assert_eq!(dto.items[0].amount, 200.0);
        assert_eq!(dto.items[1].amount, 29.97);
        assert_eq!(dto.items[2].amount, 50.0);
        assert_eq!(dto.items[2].quantity, 1.0);
    }

    #[test]
    fn test_item_errors_are_indexed() {
        let err = CreateInvoice::from_payload(
            &json!({ "clientId": 1, "items": [ { "description": "ok" }, { "quantity": 2 } ] }),
            SpellingPolicy::Reject,
        )
        .unwrap_err();
        assert!(err.has_field("items[1].description"));
        assert!(!err.has_field("items[0].description"));
    }

    #[test]
    fn test_due_date_before_issue_date_rejected() {
        let err = CreateInvoice::from_payload(
            &json!({ "clientId": 1, "issueDate": "2024-05-10", "dueDate": "2024-05-01" }),
            SpellingPolicy::Reject,
        )
        .unwrap_err();
        assert!(err.has_field("dueDate"));
    }

    #[test]
    fn test_update_only_carries_present_fields() {
        let dto = UpdateInvoice::from_payload(&json!({ "tax": "5", "notes": null }), SpellingPolicy::Reject)
            .unwrap();
        assert_eq!(dto.tax, Patch::Set(5.0));
        assert_eq!(dto.notes, Patch::Null);
        assert!(dto.amount.is_unset());
        assert!(dto.items.is_unset());

        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value, json!({ "tax": 5.0, "notes": null }));
    }

    #[test]
    fn test_update_rejects_null_client() {
        let err = UpdateInvoice::from_payload(&json!({ "client_id": null }), SpellingPolicy::Reject)
            .unwrap_err();
        assert!(err.has_field("clientId"));
    }
}
