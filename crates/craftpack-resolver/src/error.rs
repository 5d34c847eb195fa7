//! Error types returned by the resolver and by metadata providers.

use std::fmt;

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Category of an outright resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionErrorKind {
    CircularDependency,
    VersionConflict,
    NotFound,
    Incompatible,
    InvalidConstraint,
    LoaderMismatch,
}

impl fmt::Display for ResolutionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CircularDependency => "circular dependency",
            Self::VersionConflict => "version conflict",
            Self::NotFound => "not found",
            Self::Incompatible => "incompatible",
            Self::InvalidConstraint => "invalid constraint",
            Self::LoaderMismatch => "loader mismatch",
        })
    }
}

/// A failure that aborts a whole `resolve` call.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{kind}: {message}")]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub message: String,
    #[help]
    pub details: Option<String>,
}

impl ResolutionError {
    pub fn new(kind: ResolutionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn circular(chain: &str) -> Self {
        Self::new(
            ResolutionErrorKind::CircularDependency,
            format!("circular dependency detected at {chain}"),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::NotFound, message)
    }

    pub fn invalid_constraint(message: impl Into<String>) -> Self {
        Self::new(ResolutionErrorKind::InvalidConstraint, message)
    }
}

/// Errors a [`crate::provider::MetadataProvider`] may return.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("mod '{id}' not found{}", version_suffix(.version))]
    NotFound { id: String, version: Option<String> },

    #[error("metadata source unavailable: {message}")]
    Unavailable { message: String },
}

fn version_suffix(version: &Option<String>) -> String {
    match version {
        Some(v) => format!(" at version {v}"),
        None => String::new(),
    }
}

impl ProviderError {
    pub fn not_found(id: &str, version: Option<&str>) -> Self {
        Self::NotFound {
            id: id.to_string(),
            version: version.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_display() {
        let err = ResolutionError::not_found("no version of 'b' matches >=2.0.0");
        assert_eq!(err.to_string(), "not found: no version of 'b' matches >=2.0.0");
        assert_eq!(err.kind, ResolutionErrorKind::NotFound);
        assert!(err.details.is_none());
    }

    #[test]
    fn details_are_attached() {
        let err = ResolutionError::circular("a@1.0.0").with_details("a@1.0.0 -> b@1.0.0");
        assert_eq!(err.kind, ResolutionErrorKind::CircularDependency);
        assert_eq!(err.details.as_deref(), Some("a@1.0.0 -> b@1.0.0"));
    }

    #[test]
    fn provider_error_display() {
        assert_eq!(
            ProviderError::not_found("jei", Some("1.0.0")).to_string(),
            "mod 'jei' not found at version 1.0.0"
        );
        assert_eq!(
            ProviderError::not_found("jei", None).to_string(),
            "mod 'jei' not found"
        );
    }
}
