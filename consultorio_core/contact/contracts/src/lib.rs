use std::future::Future;

use consultorio_email_contracts::ProviderError;
use consultorio_models::{contact::ContactMessage, email_id::EmailId};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Forward a contact form submission to the practice's inbox.
    ///
    /// The email provider is called exactly once, there are no retries.
    fn send_message(
        &self,
        message: ContactMessage,
    ) -> impl Future<Output = Result<EmailId, ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send message: {0}")]
    Send(ProviderError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        message: ContactMessage,
        result: Result<EmailId, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(message))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
