//! Client-side input checks, applied before anything touches the
//! network. A value rejected here is never sent to the API.

/// Minimum password length accepted at registration and password change.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Errors from client-side input validation.
///
/// Display strings double as the user-visible message; the shell
/// localizes them by key if it needs to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email address looks invalid")]
    InvalidEmail,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Full name is required")]
    EmptyName,
    #[error("Describe your symptoms before starting triage")]
    EmptyComplaint,
    #[error("Type a message before sending")]
    EmptyMessage,
}

/// Structural email check: one '@', non-empty local part, domain with a dot.
/// The API does the authoritative validation; this only catches typos early.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail);
    }
    if email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Minimum-length password check (counts chars, not bytes).
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Length check plus confirmation match, for register / change-password.
pub fn validate_password_pair(password: &str, confirm: &str) -> Result<(), ValidationError> {
    validate_password(password)?;
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_full_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Trim the chief complaint, rejecting empty and whitespace-only input.
pub fn validate_chief_complaint(complaint: &str) -> Result<String, ValidationError> {
    let trimmed = complaint.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyComplaint);
    }
    Ok(trimmed.to_string())
}

/// Trim an outgoing chat message, rejecting empty input.
pub fn validate_chat_message(message: &str) -> Result<String, ValidationError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(trimmed.to_string())
}
