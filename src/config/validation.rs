use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Application name must not be empty")]
    EmptyApplicationName,

    #[error("Application name '{name}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidApplicationName { name: String },

    #[error("Page sizes must be positive: {field} = {value}")]
    InvalidPageSize { field: String, value: u32 },

    #[error("default_page_size ({default}) exceeds max_page_size ({max})")]
    DefaultPageSizeExceedsMax { default: u32, max: u32 },

    #[error("max_body_bytes must be positive")]
    InvalidBodyLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_application(config)?;
    validate_pagination(config)?;
    validate_server(config)?;
    Ok(())
}

/// The name is embedded in header names, so it must be a valid header token
fn validate_application(config: &Config) -> Result<(), ValidationError> {
    let name = &config.application.name;
    if name.is_empty() {
        return Err(ValidationError::EmptyApplicationName);
    }

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ValidationError::InvalidApplicationName { name: name.clone() });
    }

    Ok(())
}

fn validate_pagination(config: &Config) -> Result<(), ValidationError> {
    let pagination = &config.pagination;

    if pagination.default_page_size == 0 {
        return Err(ValidationError::InvalidPageSize {
            field: "default_page_size".to_string(),
            value: pagination.default_page_size,
        });
    }
    if pagination.max_page_size == 0 {
        return Err(ValidationError::InvalidPageSize {
            field: "max_page_size".to_string(),
            value: pagination.max_page_size,
        });
    }
    if pagination.default_page_size > pagination.max_page_size {
        return Err(ValidationError::DefaultPageSizeExceedsMax {
            default: pagination.default_page_size,
            max: pagination.max_page_size,
        });
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::InvalidBodyLimit);
    }
    Ok(())
}
