//! Input validation for admin accounts and agent skeleton edits.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Value too short.
    TooShort { field: String, min: usize },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Number outside its allowed range.
    OutOfRange { field: String, min: f64, max: f64 },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum allowed length for passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum allowed length for passwords.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum allowed length for agent prompts.
pub const MAX_PROMPT_LENGTH: usize = 32 * 1024;

/// Maximum allowed length for model names.
pub const MAX_MODEL_LENGTH: usize = 64;

/// Validate an admin email address.
///
/// Accepts `local@domain.tld` shapes only; the address is trimmed first.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let invalid = |reason: &str| Err(ValidationError::InvalidEmail(reason.to_string()));

    let Some((local, domain)) = email.split_once('@') else {
        return invalid("must contain an @ symbol");
    };

    if domain.contains('@') {
        return invalid("must contain exactly one @ symbol");
    }
    if local.is_empty() {
        return invalid("missing local part (before @)");
    }
    if domain.is_empty() {
        return invalid("missing domain (after @)");
    }
    if !domain.contains('.') {
        return invalid("domain must contain at least one dot");
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return invalid("domain has a misplaced dot");
    }

    Ok(())
}

/// Validate a sign-up password.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty("password".to_string()));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LENGTH,
            actual: password.len(),
        });
    }

    Ok(())
}

/// Validate an agent prompt body.
pub fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::Empty("prompt".to_string()));
    }

    if prompt.len() > MAX_PROMPT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "prompt".to_string(),
            max: MAX_PROMPT_LENGTH,
            actual: prompt.len(),
        });
    }

    Ok(())
}

/// Validate an interruption sensitivity (0.0 to 1.0 inclusive).
pub fn validate_interruption_sensitivity(value: f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "interruption sensitivity".to_string(),
            min: 0.0,
            max: 1.0,
        });
    }

    Ok(())
}

/// Validate a model name length.
pub fn validate_model_length(model: &str) -> Result<(), ValidationError> {
    let model = model.trim();

    if model.is_empty() {
        return Err(ValidationError::Empty("model".to_string()));
    }

    if model.len() > MAX_MODEL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "model".to_string(),
            max: MAX_MODEL_LENGTH,
            actual: model.len(),
        });
    }

    Ok(())
}
