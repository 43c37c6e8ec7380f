//! Utility functions (boundary validation)

use crate::error::{IntakeError, Result};

/// Basic email shape validation, applied before scoring
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(IntakeError::Validation("Email is empty".to_string()));
    }

    if !email.contains('@') {
        return Err(IntakeError::Validation(
            "Email must contain @".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(IntakeError::Validation("Invalid email format".to_string()));
    }

    if parts[0].is_empty() || parts[1].is_empty() {
        return Err(IntakeError::Validation(
            "Email parts cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Required free-text field must be present and non-blank
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IntakeError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
