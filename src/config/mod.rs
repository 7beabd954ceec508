//! Configuration loading and management

use crate::core::error::{ConfigError, DeskError, DeskResult};
use crate::core::field::SpellingPolicy;
use crate::core::numbering::{self, InvoiceNumbering};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

/// Listening address of the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How new invoice numbers are issued
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InvoicingConfig {
    /// Uppercase letters placed before the hyphen (e.g. "INV")
    #[validate(custom(function = validate_prefix))]
    pub prefix: String,

    /// Minimum number of digits in the counter
    #[validate(range(min = 1, max = 10))]
    pub padding: usize,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            prefix: numbering::DEFAULT_PREFIX.to_string(),
            padding: numbering::DEFAULT_PADDING,
        }
    }
}

fn validate_prefix(prefix: &str) -> Result<(), validator::ValidationError> {
    let valid = (1..=10).contains(&prefix.len()) && prefix.chars().all(|c| c.is_ascii_uppercase());
    if valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invoice_prefix")
            .with_message("must be 1-10 uppercase ASCII letters".into()))
    }
}

/// Request body normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FieldsConfig {
    /// Tie-break when a field arrives under both spellings
    pub spelling: SpellingPolicy,
}

/// CSRF token issuing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CsrfConfig {
    pub enabled: bool,

    /// Lifetime of an issued token
    #[validate(range(min = 1))]
    pub ttl_secs: u64,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 3600,
        }
    }
}

impl CsrfConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Complete configuration of the desk server
///
/// Every section is optional in YAML and falls back to its defaults.
///
/// ```yaml
/// server:
///   port: 8080
/// invoicing:
///   prefix: FAC
///   padding: 5
/// fields:
///   spelling: prefer_camel
/// csrf:
///   enabled: true
///   ttl_secs: 900
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DeskConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub invoicing: InvoicingConfig,

    #[validate(nested)]
    pub fields: FieldsConfig,

    #[validate(nested)]
    pub csrf: CsrfConfig,
}

impl DeskConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> DeskResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::parse(&content).map_err(|err| match err {
            DeskError::Config(ConfigError::ParseError { message, .. }) => {
                ConfigError::ParseError {
                    file: Some(path.display().to_string()),
                    message,
                }
                .into()
            }
            other => other,
        })
    }

    /// Load and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> DeskResult<Self> {
        Self::parse(yaml)
    }

    fn parse(yaml: &str) -> DeskResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Invoice numbering derived from the `invoicing` section
    pub fn numbering(&self) -> InvoiceNumbering {
        InvoiceNumbering::new(self.invoicing.prefix.clone(), self.invoicing.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = DeskConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config.server.addr(), "127.0.0.1:3000");
        assert_eq!(config.numbering(), InvoiceNumbering::default());
        assert_eq!(config.fields.spelling, SpellingPolicy::Reject);
        assert!(!config.csrf.enabled);
        assert_eq!(config.csrf.ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
invoicing:
  prefix: FAC
fields:
  spelling: prefer_camel
"#;
        let config = DeskConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.invoicing.prefix, "FAC");
        assert_eq!(config.invoicing.padding, 4);
        assert_eq!(config.fields.spelling, SpellingPolicy::PreferCamel);
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let err = DeskConfig::from_yaml_str("invoicing:\n  prefix: inv-\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(matches!(
            err,
            DeskError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zero_padding_and_ttl_rejected() {
        assert!(DeskConfig::from_yaml_str("invoicing:\n  padding: 0\n").is_err());
        assert!(DeskConfig::from_yaml_str("csrf:\n  ttl_secs: 0\n").is_err());
    }

    #[test]
    fn test_unknown_spelling_policy_is_parse_error() {
        let err = DeskConfig::from_yaml_str("fields:\n  spelling: snake_wins\n").unwrap_err();
        assert!(matches!(
            err,
            DeskError::Config(ConfigError::ParseError { .. })
        ));
    }
}
