//! Request field validation shared by the auth and messaging handlers.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::AppError;

pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 8;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 300;

static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("USERNAME_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("EMAIL_REGEX: invalid regex pattern")
});

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("CODE_REGEX: invalid regex pattern"));

/// Per-field validation messages, rendered as `{"field": ["message", ...]}`.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// The first message, used as the envelope's top-level `message`.
    pub fn summary(&self) -> String {
        self.0
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .cloned()
            .unwrap_or_else(|| "Invalid request".to_string())
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn check_username(errors: &mut FieldErrors, username: &str) {
    let len = username.chars().count();
    if len < USERNAME_MIN {
        errors.add("username", "Username must be at least 2 characters");
    } else if len > USERNAME_MAX {
        errors.add("username", "Username must be no more than 20 characters");
    }
    if len > 0 && !USERNAME_REGEX.is_match(username) {
        errors.add("username", "Username must not contain special characters");
    }
}

/// Expects an already normalized (trimmed, lowercased) address.
pub fn check_email(errors: &mut FieldErrors, email: &str) {
    if !EMAIL_REGEX.is_match(email) {
        errors.add("email", "Invalid email address");
    }
}

pub fn check_password(errors: &mut FieldErrors, password: &str) {
    let strong = password.chars().count() >= PASSWORD_MIN
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase());
    if !strong {
        errors.add(
            "password",
            "Password must be at least 8 characters and contain an uppercase letter, a lowercase letter and a number",
        );
    }
}

/// Expects already trimmed content.
pub fn check_message_content(errors: &mut FieldErrors, content: &str) {
    let len = content.chars().count();
    if len < MESSAGE_MIN {
        errors.add("content", "Content must be at least 10 characters");
    } else if len > MESSAGE_MAX {
        errors.add("content", "Content must be no longer than 300 characters");
    }
}

pub fn check_verify_code(errors: &mut FieldErrors, code: &str) {
    if !CODE_REGEX.is_match(code) {
        errors.add("code", "Verification code must be exactly 6 digits");
    }
}
