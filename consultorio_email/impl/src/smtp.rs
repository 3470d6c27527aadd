use anyhow::anyhow;
use consultorio_email_contracts::{
    ContentType, Email, EmailSendError, EmailService, ProviderError,
};
use consultorio_models::{email_address::EmailAddressWithName, email_id::EmailId};
use consultorio_utils::Apply;
use lettre::{
    message::{header, MessageBuilder},
    transport::smtp::response::Code,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SmtpEmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailServiceImpl {
    /// Must be called inside a tokio runtime, the connection pool spawns a
    /// background task.
    pub fn new(url: &str, from: EmailAddressWithName) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build();

        Ok(Self { from, transport })
    }

    /// Message ids are generated locally, SMTP servers do not report one back.
    fn generate_message_id(&self) -> String {
        format!("{}@{}", Uuid::new_v4(), self.from.0.email.domain())
    }
}

impl EmailService for SmtpEmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailId, EmailSendError> {
        let message_id = self.generate_message_id();

        let message = Message::builder()
            .message_id(Some(format!("<{message_id}>")))
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .map_err(anyhow::Error::from)?;

        match self.transport.send(message).await {
            Ok(response) if response.is_positive() => Ok(message_id.into()),
            Ok(response) => Err(EmailSendError::Rejected(ProviderError {
                code: reply_code(response.code()),
                name: None,
                message: response.first_line().unwrap_or_default().into(),
            })),
            Err(err) if err.is_permanent() => Err(EmailSendError::Rejected(ProviderError {
                code: err.status().and_then(reply_code),
                name: None,
                message: err.to_string(),
            })),
            Err(err) => Err(anyhow::Error::from(err).into()),
        }
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn reply_code(code: Code) -> Option<u16> {
    code.to_string().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn message_id_uses_sender_domain() {
        // Arrange
        let sut = SmtpEmailServiceImpl::new(
            "smtp://127.0.0.1:2525",
            "Contato Kelly Amorim <contato@kellyamorim.com.br>"
                .parse()
                .unwrap(),
        )
        .unwrap();

        // Act
        let a = sut.generate_message_id();
        let b = sut.generate_message_id();

        // Assert
        assert!(a.ends_with("@kellyamorim.com.br"));
        assert_ne!(a, b);
    }
}
