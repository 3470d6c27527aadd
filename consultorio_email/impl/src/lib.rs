use consultorio_email_contracts::{Email, EmailSendError, EmailService};
use consultorio_models::email_id::EmailId;

pub use crate::{
    resend::{ResendEmailServiceConfig, ResendEmailServiceImpl},
    smtp::SmtpEmailServiceImpl,
};

mod http;
pub mod resend;
pub mod smtp;

/// The email provider selected in the configuration.
#[derive(Debug, Clone)]
pub enum EmailServiceImpl {
    Resend(ResendEmailServiceImpl),
    Smtp(SmtpEmailServiceImpl),
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailId, EmailSendError> {
        match self {
            Self::Resend(resend) => resend.send(email).await,
            Self::Smtp(smtp) => smtp.send(email).await,
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        match self {
            Self::Resend(resend) => resend.ping().await,
            Self::Smtp(smtp) => smtp.ping().await,
        }
    }
}

impl From<ResendEmailServiceImpl> for EmailServiceImpl {
    fn from(value: ResendEmailServiceImpl) -> Self {
        Self::Resend(value)
    }
}

impl From<SmtpEmailServiceImpl> for EmailServiceImpl {
    fn from(value: SmtpEmailServiceImpl) -> Self {
        Self::Smtp(value)
    }
}
