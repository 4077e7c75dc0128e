use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateLength;

use crate::{entities::contact::ContactForm, errors::ValidationFailure};

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Maximum lengths, in characters, for each form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLimits {
    pub name: usize,
    pub email: usize,
    pub message: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        FieldLimits {
            name: 100,
            email: 254,
            message: 2000,
        }
    }
}

/// Checks presence, then email shape, then lengths. The first failing
/// check decides the verdict.
pub fn validate_contact_form(form: &ContactForm, limits: &FieldLimits) -> Result<(), ValidationFailure> {
    if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
        return Err(ValidationFailure::MissingFields);
    }

    if !is_email_shaped(&form.email) {
        return Err(ValidationFailure::InvalidEmail);
    }

    let within = |value: &String, max: usize| value.validate_length(None, Some(max as u64), None);

    if !within(&form.name, limits.name)
        || !within(&form.email, limits.email)
        || !within(&form.message, limits.message)
    {
        return Err(ValidationFailure::ContentTooLong);
    }

    Ok(())
}

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}
