//! HTTP handlers
//!
//! Handlers receive already-normalized DTOs through the
//! [`Validated`](crate::core::validation::Validated) extractor, check that
//! referenced records exist, and go through the [`DataService`](crate::core::DataService)
//! of each entity.

pub mod clients;
pub mod csrf;
pub mod health;
pub mod invoices;
pub mod projects;
pub mod tasks;
pub mod time_entries;

use crate::core::error::{DeskResult, RequestError};

/// Parse an id path segment
pub(crate) fn parse_id(raw: &str) -> DeskResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RequestError::InvalidEntityId { id: raw.to_string() }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(parse_id("0").is_err());
        assert!(parse_id("abc").is_err());
        assert!(parse_id("-3").is_err());
    }
}
