//! Route table of the desk API

use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{clients, csrf, health, invoices, projects, tasks, time_entries};
use super::state::AppState;

/// Build every route of the API
///
/// - GET /health
/// - POST /csrf-token
/// - GET|POST /{collection} and GET|PUT|PATCH|DELETE /{collection}/{id} for
///   clients, projects, tasks, time-entries and invoices (PUT and PATCH are
///   both partial updates)
/// - GET /invoices/next-number
/// - GET /invoices/number-exists?number=..&exclude_id=..
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/csrf-token", post(csrf::issue_token))
        .route(
            "/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .patch(clients::update_client)
                .delete(clients::delete_client),
        )
        .route(
            "/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/time-entries",
            get(time_entries::list_time_entries).post(time_entries::create_time_entry),
        )
        .route(
            "/time-entries/{id}",
            get(time_entries::get_time_entry)
                .put(time_entries::update_time_entry)
                .patch(time_entries::update_time_entry)
                .delete(time_entries::delete_time_entry),
        )
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/next-number", get(invoices::get_next_number))
        .route("/invoices/number-exists", get(invoices::number_exists))
        .route(
            "/invoices/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .patch(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .with_state(state)
}
