//! Error types shared by the specification model and the registry

use thiserror::Error;

/// Errors raised while defining, resolving, or linking module specifications
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SpecError {
    /// A required identity field is empty or otherwise unusable
    #[error("Invalid module specification: {0}")]
    InvalidSpecification(String),

    /// A module identifier string could not be parsed
    #[error("Malformed module identifier '{input}': {reason}")]
    MalformedIdentifier { input: String, reason: String },

    /// A dependency names a module that no finder could supply
    #[error("Module {module} depends on {dependency}, which could not be resolved")]
    UnresolvedDependency { module: String, dependency: String },

    /// The requested module is not defined anywhere
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    /// A module with this name is already published
    #[error("Module already defined: {0}")]
    DuplicateModule(String),

    /// A dependency's version constraint rejects the resolved target
    #[error("Module {module} requires {dependency} {required}, found {found}")]
    IncompatibleVersion {
        module: String,
        dependency: String,
        required: String,
        found: String,
    },
}

impl SpecError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        SpecError::MalformedIdentifier {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fail with `InvalidSpecification` when a required name is empty
pub(crate) fn require_name(value: &str, what: &str) -> Result<(), SpecError> {
    if value.is_empty() {
        return Err(SpecError::InvalidSpecification(format!(
            "{} cannot be empty",
            what
        )));
    }
    Ok(())
}
