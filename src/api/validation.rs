use thiserror::Error;

use super::models::FieldError;
use crate::domain::{ENTITY_NAME, NAME_MAX_LENGTH, Publisher, PublisherPatch};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PublisherValidationError {
    #[error("name must be at most {max} characters, got {actual}")]
    NameTooLong { max: usize, actual: usize },
}

impl PublisherValidationError {
    pub fn field_error(&self) -> FieldError {
        match self {
            PublisherValidationError::NameTooLong { .. } => FieldError {
                object_name: ENTITY_NAME,
                field: "name",
                message: "Size",
            },
        }
    }
}

pub fn validate_publisher(publisher: &Publisher) -> Result<(), PublisherValidationError> {
    validate_name(&publisher.name)
}

/// Only the fields present in the patch are checked.
pub fn validate_patch(patch: &PublisherPatch) -> Result<(), PublisherValidationError> {
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), PublisherValidationError> {
    let length = name.chars().count();
    if length > NAME_MAX_LENGTH {
        return Err(PublisherValidationError::NameTooLong {
            max: NAME_MAX_LENGTH,
            actual: length,
        });
    }
    Ok(())
}
