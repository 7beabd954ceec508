//! Validation and filtering system
//!
//! Filters normalize raw string input before it is coerced, validators check
//! already-coerced values, and the [`Validated`] extractor runs a DTO builder
//! over the request body before it reaches a handler.

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::Validated;
