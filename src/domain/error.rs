//! Domain errors

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Field-level validation failure map.
///
/// Collects one message per offending field so the API layer can surface
/// errors inline next to the field. Returned, never thrown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when no field failed, otherwise the report itself.
    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ValidationReport> for DomainError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}

impl DomainError {
    /// Single-field validation error shortcut
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut report = ValidationReport::new();
        report.push(field, message);
        Self::Validation(report)
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_ok() {
        assert!(ValidationReport::new().into_result().is_ok());
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut report = ValidationReport::new();
        report.push("email", "required");
        report.push("email", "second message is dropped");
        assert_eq!(report.field("email"), Some("required"));
    }

    #[test]
    fn display_joins_fields() {
        let mut report = ValidationReport::new();
        report.push("end", "end must not precede start");
        report.push("status", "required");
        assert_eq!(
            report.to_string(),
            "end: end must not precede start; status: required"
        );
    }
}
