//! HTTP server exposing the desk API
//!
//! [`ServerBuilder`] assembles the router from configuration: CRUD routes for
//! every entity, invoice numbering helpers, CSRF token issuing and the
//! tracing and CORS layers.

pub mod builder;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use router::build_routes;
pub use state::AppState;
