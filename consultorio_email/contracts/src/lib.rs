use std::future::Future;

use consultorio_models::{email_address::EmailAddressWithName, email_id::EmailId};
use serde::Serialize;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Hand the email over to the provider and return the identifier it assigned.
    fn send(&self, email: Email) -> impl Future<Output = Result<EmailId, EmailSendError>> + Send;

    /// Check that the provider is reachable with the configured credentials.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: EmailAddressWithName,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    /// The provider answered and refused to send the email.
    #[error("Email provider rejected the message: {0}")]
    Rejected(ProviderError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error reported by the email provider, e.g. an unverified sender domain or an
/// exceeded rate limit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status or SMTP reply code.
    pub code: Option<u16>,
    pub name: Option<String>,
    pub message: String,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, id: EmailId) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(id))));
        self
    }

    pub fn with_send_rejected(mut self, email: Email, error: ProviderError) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| {
                Box::pin(std::future::ready(Err(EmailSendError::Rejected(error))))
            });
        self
    }

    pub fn with_send_failed(mut self, email: Email, error: anyhow::Error) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Err(error.into()))));
        self
    }
}
