use crate::errors::{AppError, Result};

pub const MAX_USERNAME_LENGTH: usize = 150;

/// Usernames double as directory names in the snapshot store, so they are
/// limited to letters, digits and `@ . + - _`, and may not be `.` or `..`.
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }

    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) || username == "." || username == ".." {
        return Err(AppError::Validation(format!("Invalid username '{}'", username)));
    }

    Ok(())
}
