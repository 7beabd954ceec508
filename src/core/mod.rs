//! Core module containing the normalization primitives, errors and service traits

pub mod csrf;
pub mod error;
pub mod field;
pub mod numbering;
pub mod service;
pub mod validation;

pub use csrf::{InMemoryTokenStore, TokenStore};
pub use error::{
    ConfigError, DeskError, DeskResult, EntityError, FieldValidationError, RequestError,
    ValidationError,
};
pub use field::{DateValue, FieldReader, Patch, SpellingPolicy};
pub use numbering::{InvoiceNumbering, NumberedInvoice};
pub use service::{DataService, Record};
pub use validation::extractor::FromPayload;
