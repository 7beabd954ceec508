//! Behaviour of the DTO builders over realistic request bodies
//!
//! Covers dual-spelling resolution, defaulting, numeric coercion, partial
//! update presence and the request → entity → response round trip.

use chrono::{TimeZone, Utc};
use desk::prelude::*;
use serde_json::{Value, json};

fn build<D: FromPayload>(body: Value) -> D {
    D::from_payload(&body, SpellingPolicy::Reject).expect("payload should be accepted")
}

fn reject<D: FromPayload + std::fmt::Debug>(body: Value) -> ValidationError {
    D::from_payload(&body, SpellingPolicy::Reject).expect_err("payload should be rejected")
}

// =============================================================================
// Field normalization
// =============================================================================

mod spelling_tests {
    use super::*;

    #[test]
    fn test_either_spelling_reaches_the_canonical_field() {
        for id in [1_i64, 7, 1234] {
            let camel: CreateInvoice = build(json!({ "clientId": id }));
            let snake: CreateInvoice = build(json!({ "client_id": id }));
            assert_eq!(camel.client_id, id);
            assert_eq!(snake.client_id, id);
        }

        let task: CreateTask = build(json!({ "title": "Draft", "project_id": 3, "dueDate": "2024-07-01" }));
        assert_eq!(task.project_id, Some(3));
        assert_eq!(task.due_date.map(|d| d.to_string()), Some("2024-07-01".to_string()));
    }

    #[test]
    fn test_conflicting_spellings_rejected_by_default() {
        let err = reject::<CreateProject>(json!({ "name": "Site", "clientId": 1, "client_id": 2 }));
        assert!(err.has_field("clientId"));
    }

    #[test]
    fn test_prefer_camel_policy_is_opt_in() {
        let body = json!({ "name": "Site", "clientId": 1, "client_id": 2 });
        let dto = CreateProject::from_payload(&body, SpellingPolicy::PreferCamel).unwrap();
        assert_eq!(dto.client_id, Some(1));
    }
}

// =============================================================================
// Create DTO defaults and coercion
// =============================================================================

mod create_tests {
    use super::*;

    #[test]
    fn test_invoice_total_is_amount_plus_tax_when_omitted() {
        let cases = [
            (json!({ "clientId": 1 }), 0.0),
            (json!({ "clientId": 1, "amount": 250 }), 250.0),
            (json!({ "clientId": 1, "tax": "19.5" }), 19.5),
            (json!({ "clientId": 1, "amount": "1000", "tax": 200 }), 1200.0),
        ];
        for (body, expected) in cases {
            let dto: CreateInvoice = build(body);
            assert_eq!(dto.total, dto.amount + dto.tax);
            assert_eq!(dto.total, expected);
        }
    }

    #[test]
    fn test_defaults_table() {
        let invoice: CreateInvoice = build(json!({ "clientId": 1 }));
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert!(matches!(invoice.issue_date, DateValue::DateTime(_)));

        let project: CreateProject = build(json!({ "name": "Site" }));
        assert_eq!(project.status, ProjectStatus::Active);

        let task: CreateTask = build(json!({ "title": "Wireframes" }));
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);

        let entry: CreateTimeEntry = build(json!({ "taskId": 2 }));
        assert!(matches!(entry.start_time, DateValue::DateTime(_)));
        assert!(!entry.is_billable);
    }

    #[test]
    fn test_unparseable_number_is_a_validation_error() {
        let err = reject::<CreateInvoice>(json!({ "clientId": 1, "tax": "ten percent" }));
        assert!(err.has_field("tax"));

        let err = reject::<CreateTimeEntry>(json!({ "taskId": 1, "duration": "an hour" }));
        assert!(err.has_field("duration"));
    }

    #[test]
    fn test_required_fields() {
        assert!(reject::<CreateInvoice>(json!({})).has_field("clientId"));
        assert!(reject::<CreateProject>(json!({ "name": "  " })).has_field("name"));
        assert!(reject::<CreateTask>(json!({ "description": "no title" })).has_field("title"));
        assert!(reject::<CreateTimeEntry>(json!({ "is_billable": true })).has_field("taskId"));
        assert!(reject::<CreateClient>(json!({ "email": "a@b.co" })).has_field("name"));
    }

    #[test]
    fn test_every_problem_is_reported_at_once() {
        let err = reject::<CreateInvoice>(json!({
            "amount": "abc",
            "status": "archived",
            "items": [ { "quantity": -1 } ]
        }));
        let fields: Vec<String> = err.fields().into_iter().map(|f| f.field).collect();
        for expected in [
            "clientId",
            "amount",
            "status",
            "items[0].description",
            "items[0].quantity",
        ] {
            assert!(fields.iter().any(|f| f == expected), "missing {expected} in {fields:?}");
        }
    }

    #[test]
    fn test_keyword_fields_are_case_insensitive() {
        let task: CreateTask = build(json!({ "title": "x", "status": "In Progress", "priority": "HIGH" }));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_end_before_start_rejected() {
        let err = reject::<CreateProject>(json!({
            "name": "Site",
            "startDate": "2024-05-01",
            "endDate": "2024-04-30"
        }));
        assert!(err.has_field("endDate"));

        let err = reject::<CreateTimeEntry>(json!({
            "taskId": 1,
            "startTime": "2024-05-01T10:00:00Z",
            "end_time": "2024-05-01T09:00:00Z"
        }));
        assert!(err.has_field("endTime"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let err = reject::<CreateClient>(json!({ "name": "Acme", "email": "not-an-email" }));
        assert!(err.has_field("email"));
    }
}

// =============================================================================
// Update DTO presence
// =============================================================================

mod update_tests {
    use super::*;

    fn keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_absent_fields_are_absent_from_the_output() {
        let dto: UpdateInvoice = build(json!({ "due_date": "2024-09-30" }));
        let out = serde_json::to_value(&dto).unwrap();
        assert_eq!(keys(&out), vec!["dueDate"]);

        let dto: UpdateTask = build(json!({}));
        assert_eq!(serde_json::to_value(&dto).unwrap(), json!({}));
        assert_eq!(dto, UpdateTask::default());

        let dto: UpdateTimeEntry = build(json!({ "isBillable": "true", "description": null }));
        let out = serde_json::to_value(&dto).unwrap();
        assert_eq!(keys(&out), vec!["description", "isBillable"]);
        assert_eq!(out["description"], Value::Null);
    }

    #[test]
    fn test_update_coerces_like_create() {
        let dto: UpdateInvoice = build(json!({ "amount": "80.25" }));
        assert_eq!(dto.amount, Patch::Set(80.25));

        let err = reject::<UpdateInvoice>(json!({ "amount": "eighty" }));
        assert!(err.has_field("amount"));
    }

    #[test]
    fn test_update_does_not_default() {
        let dto: UpdateProject = build(json!({ "name": "Renamed" }));
        assert!(dto.status.is_unset());
        assert!(dto.client_id.is_unset());
    }

    #[test]
    fn test_nulling_required_fields_rejected() {
        assert!(reject::<UpdateProject>(json!({ "name": null })).has_field("name"));
        assert!(reject::<UpdateTask>(json!({ "title": "" })).has_field("title"));
        assert!(reject::<UpdateTimeEntry>(json!({ "task_id": null })).has_field("taskId"));
        assert!(reject::<UpdateClient>(json!({ "name": null })).has_field("name"));
    }
}

// =============================================================================
// Round trip
// =============================================================================

mod round_trip_tests {
    use super::*;

    #[test]
    fn test_invoice_response_preserves_supplied_fields() {
        let request = json!({
            "client_id": 4,
            "projectId": 9,
            "invoiceNumber": "INV-0042",
            "amount": "1500",
            "tax": 300,
            "total": 1790,
            "status": "sent",
            "issueDate": "2024-03-01",
            "due_date": "2024-03-31",
            "sentDate": "2024-03-02T08:15:00Z",
            "notes": "Thanks!",
            "items": [
                { "description": "Design", "hoursWorked": 10, "ratePerHour": 150, "taskId": 11 },
                { "description": "Hosting", "quantity": 1, "unitPrice": 0, "amount": 0, "projectId": 9 }
            ]
        });
        let dto: CreateInvoice = build(request);
        let number = dto.invoice_number.clone().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut invoice = Invoice::from_create(dto, number, now);
        invoice.id = 1;

        let names = NameIndex::new();
        let out = serde_json::to_value(InvoiceResponse::from_entity(&invoice, &names)).unwrap();

        assert_eq!(out["client_id"], 4);
        assert_eq!(out["project_id"], 9);
        assert_eq!(out["invoice_number"], "INV-0042");
        assert_eq!(out["amount"], 1500.0);
        assert_eq!(out["tax"], 300.0);
        assert_eq!(out["total"], 1790.0);
        assert_eq!(out["status"], "sent");
        assert_eq!(out["issue_date"], "2024-03-01");
        assert_eq!(out["due_date"], "2024-03-31");
        assert_eq!(out["sent_date"], "2024-03-02T08:15:00Z");
        assert_eq!(out["notes"], "Thanks!");

        let items = out["items"].as_array().unwrap();
        assert_eq!(items[0]["description"], "Design");
        assert_eq!(items[0]["hours_worked"], 10.0);
        assert_eq!(items[0]["rate_per_hour"], 150.0);
        assert_eq!(items[0]["amount"], 1500.0);
        assert_eq!(items[0]["task_id"], 11);
        assert_eq!(items[0]["type"], "hourly");
        assert_eq!(items[1]["project_id"], 9);
        assert_eq!(items[1]["type"], "fixed");
    }

    #[test]
    fn test_item_names_resolved_through_lookup() {
        let now = Utc::now();
        let project: CreateProject = build(json!({ "name": "Website" }));
        let mut project = Project::from_create(project, now);
        project.id = 9;
        let task: CreateTask = build(json!({ "title": "Landing page", "projectId": 9 }));
        let mut task = Task::from_create(task, now);
        task.id = 11;

        let dto: CreateInvoice = build(json!({
            "clientId": 1,
            "items": [ { "description": "Build", "projectId": 9, "taskId": 11, "hoursWorked": 2 } ]
        }));
        let invoice = Invoice::from_create(dto, "INV-0001".to_string(), now);

        let names = NameIndex::new()
            .with_projects([&project])
            .with_tasks([&task]);
        let response = InvoiceResponse::from_entity(&invoice, &names);

        assert_eq!(response.items[0].project_name.as_deref(), Some("Website"));
        assert_eq!(response.items[0].task_name.as_deref(), Some("Landing page"));
        assert_eq!(response.items[0].kind, ItemKind::Hourly);
        assert_eq!(response.client_name, None);
    }

    #[test]
    fn test_time_entry_response_preserves_supplied_fields() {
        let dto: CreateTimeEntry = build(json!({
            "task_id": 3,
            "projectId": 2,
            "description": "Call with client",
            "startTime": "2024-02-10T14:00:00Z",
            "endTime": "2024-02-10T17:30:00+02:00",
            "duration": "1.5",
            "is_billable": true
        }));
        let mut entry = TimeEntry::from_create(dto, Utc::now());
        entry.id = 1;

        let out = serde_json::to_value(TimeEntryResponse::from_entity(&entry, &NameIndex::new())).unwrap();
        assert_eq!(out["task_id"], 3);
        assert_eq!(out["project_id"], 2);
        assert_eq!(out["description"], "Call with client");
        assert_eq!(out["start_time"], "2024-02-10T14:00:00Z");
        assert_eq!(out["end_time"], "2024-02-10T17:30:00+02:00");
        assert_eq!(out["duration"], 1.5);
        assert_eq!(out["is_billable"], true);
    }

    #[test]
    fn test_project_response_preserves_supplied_fields() {
        let dto: CreateProject = build(json!({
            "client_id": 5,
            "name": "Rebrand",
            "description": "Logo and palette",
            "status": "on_hold",
            "start_date": "2024-01-15",
            "endDate": "2024-04-15"
        }));
        let project = Project::from_create(dto, Utc::now());

        let out = serde_json::to_value(ProjectResponse::from(&project)).unwrap();
        assert_eq!(out["client_id"], 5);
        assert_eq!(out["name"], "Rebrand");
        assert_eq!(out["description"], "Logo and palette");
        assert_eq!(out["status"], "on_hold");
        assert_eq!(out["start_date"], "2024-01-15");
        assert_eq!(out["end_date"], "2024-04-15");
    }
}
