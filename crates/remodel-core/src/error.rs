//! Error handling
//!
//! Structural errors (missing wrapper, missing resource location, invalid
//! save action, schema mismatch) are programmer errors and propagate to the
//! caller as [`WrapperError`]. Operational failures such as a non-success
//! status or a malformed body never show up here; they degrade to an empty
//! [`Outcome`](crate::outcome::Outcome).

use thiserror::Error;

/// Errors raised by the mapping engine and the sync orchestrator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WrapperError {
    /// The entity type has no wrapper configuration
    #[error("Wrapper is not defined for {entity}")]
    WrapperNotDefined { entity: String },

    /// Neither an explicit location nor a default resource location exists
    #[error("Resource URL is not defined for {entity}")]
    UrlNotDefined { entity: String },

    /// The record is neither new nor identified (saved, then its id was cleared)
    #[error("Action is not implemented for {entity}: the record is stored but has no id")]
    ActionNotImplemented { entity: String },

    /// A field map entry names an attribute the entity type does not declare
    #[error("Field '{attribute}' in JSON is missing on {entity}")]
    FieldMissing { attribute: String, entity: String },
}

impl WrapperError {
    /// Name of the entity type the error was raised for
    pub fn entity(&self) -> &str {
        match self {
            WrapperError::WrapperNotDefined { entity }
            | WrapperError::UrlNotDefined { entity }
            | WrapperError::ActionNotImplemented { entity }
            | WrapperError::FieldMissing { entity, .. } => entity,
        }
    }

    /// Whether the error stems from schema registration rather than record state
    pub fn is_configuration(&self) -> bool {
        !matches!(self, WrapperError::ActionNotImplemented { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WrapperError::WrapperNotDefined { .. } => {
                "Register a wrapper (field map and relations) for the entity type."
            }
            WrapperError::UrlNotDefined { .. } => {
                "Give the entity type a location, set a schema base_url, or pass a location explicitly."
            }
            WrapperError::ActionNotImplemented { .. } => {
                "Restore the record's id before saving, or save a fresh record to create it."
            }
            WrapperError::FieldMissing { .. } => {
                "Declare the attribute on the entity type or remove it from the wrapper's field map."
            }
        }
    }
}

/// Result type for mapping and sync operations
pub type WrapperResult<T> = Result<T, WrapperError>;

/// Errors found while registering entity types
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two entity types share a name
    #[error("Entity type '{name}' is registered twice")]
    DuplicateEntity { name: String },

    /// An association points at an entity type that is not registered
    #[error("Association '{association}' on {entity} targets unknown entity type '{target}'")]
    UnknownTarget {
        entity: String,
        association: String,
        target: String,
    },

    /// An association name is declared twice on the same entity type
    #[error("Association '{association}' is declared twice on {entity}")]
    DuplicateAssociation { entity: String, association: String },

    /// A wrapper relation does not name a declared association
    #[error("Relation '{relation}' in the wrapper of {entity} is not a declared association")]
    UndeclaredRelation { entity: String, relation: String },

    /// A field map key (remote or local side) appears more than once
    #[error("Field map of {entity} maps '{key}' more than once")]
    DuplicateField { entity: String, key: String },

    /// A schema file could not be parsed
    #[error("Invalid schema file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WrapperError::FieldMissing {
            attribute: "nickname".to_string(),
            entity: "User".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("nickname"));
        assert!(msg.contains("User"));
        assert_eq!(err.entity(), "User");
    }

    #[test]
    fn test_configuration_classification() {
        let wrapper = WrapperError::WrapperNotDefined {
            entity: "Plan".to_string(),
        };
        let action = WrapperError::ActionNotImplemented {
            entity: "Task".to_string(),
        };

        assert!(wrapper.is_configuration());
        assert!(!action.is_configuration());
        assert!(action.recovery_suggestion().contains("id"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UndeclaredRelation {
            entity: "User".to_string(),
            relation: "friends".to_string(),
        };
        assert!(err.to_string().contains("friends"));
    }
}
