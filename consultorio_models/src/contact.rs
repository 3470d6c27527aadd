use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permissive email pattern: no whitespace, exactly one `@` and at least one `.`
/// after it.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// The raw contents of the contact form, exactly as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactFormData {
    /// Whether name, email and message are all non-blank.
    pub fn has_required_fields(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .into_iter()
            .all(|field| !is_blank(field))
    }
}

/// A validated contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: Option<ContactMessageSubject>,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactAuthorName,
    pub email: ContactEmailAddress,
    pub phone: Option<ContactPhone>,
}

#[nutype(
    validate(predicate = |name| !is_blank(name)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactAuthorName(String);

/// The visitor's email address as accepted by the contact form.
///
/// This is intentionally more permissive than an RFC 5322 parser, so it does not
/// guarantee that an email provider accepts it as a recipient.
#[nutype(
    validate(predicate = |email| EMAIL_PATTERN.is_match(email)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Display, Serialize, Deserialize)
)]
pub struct ContactEmailAddress(String);

/// Optional phone number. A whitespace-only value is treated like an empty one, so
/// the email shows no phone block for it.
#[nutype(
    validate(predicate = |phone| !is_blank(phone)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactPhone(String);

/// Optional subject. A whitespace-only value falls back to the default subject,
/// the same as an empty one.
#[nutype(
    validate(predicate = |subject| !is_blank(subject)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    validate(predicate = |content| !is_blank(content)),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    /// Name, email or message is missing or blank.
    #[error("Name, email and message are required.")]
    MissingRequiredFields,
    #[error("Invalid email address.")]
    InvalidEmail,
}

impl TryFrom<ContactFormData> for ContactMessage {
    type Error = ContactValidationError;

    /// Required fields are checked before the email format, so a blank email is
    /// reported as missing rather than invalid.
    fn try_from(form: ContactFormData) -> Result<Self, Self::Error> {
        if !form.has_required_fields() {
            return Err(ContactValidationError::MissingRequiredFields);
        }

        let name = ContactAuthorName::try_new(form.name)
            .map_err(|_| ContactValidationError::MissingRequiredFields)?;
        let content = ContactMessageContent::try_new(form.message)
            .map_err(|_| ContactValidationError::MissingRequiredFields)?;
        let email = ContactEmailAddress::try_new(form.email)
            .map_err(|_| ContactValidationError::InvalidEmail)?;

        Ok(Self {
            author: ContactMessageAuthor {
                name,
                email,
                phone: ContactPhone::try_new(form.phone).ok(),
            },
            subject: ContactMessageSubject::try_new(form.subject).ok(),
            content,
        })
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
