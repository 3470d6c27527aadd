use std::sync::Arc;

use chrono::Local;
use consultorio_core_contact_contracts::{ContactSendMessageError, ContactService};
use consultorio_email_contracts::{ContentType, Email, EmailSendError, EmailService};
use consultorio_models::{
    contact::ContactMessage,
    email_address::{EmailAddress, EmailAddressWithName},
    email_id::EmailId,
};
use consultorio_shared_contracts::time::TimeService;
use consultorio_templates_contracts::{ContactMessageTemplate, TemplateService};
use tracing::{error, info, warn};

/// `dd/mm/yyyy, HH:MM:SS`, as used in Brazil.
const RECEIVED_AT_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template, Time> {
    email: Email,
    template: Template,
    time: Time,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// The practice owner's inbox.
    pub recipient: Arc<EmailAddressWithName>,
    pub subject_prefix: Arc<str>,
    /// Used when the visitor left the subject empty.
    pub default_subject: Arc<str>,
    /// Shown in the footer of the email.
    pub origin: Arc<str>,
}

impl<EmailS, Template, Time> ContactServiceImpl<EmailS, Template, Time> {
    pub fn new(email: EmailS, template: Template, time: Time, config: ContactServiceConfig) -> Self {
        Self {
            email,
            template,
            time,
            config,
        }
    }
}

impl<EmailS, Template, Time> ContactService for ContactServiceImpl<EmailS, Template, Time>
where
    EmailS: EmailService,
    Template: TemplateService,
    Time: TimeService,
{
    async fn send_message(&self, message: ContactMessage) -> Result<EmailId, ContactSendMessageError> {
        let subject = format!(
            "{}{}",
            self.config.subject_prefix,
            message
                .subject
                .as_deref()
                .map_or(&*self.config.default_subject, String::as_str)
        );

        // A bare address only, so a display name smuggled into the form field
        // cannot redirect replies.
        let reply_to = match message.author.email.parse::<EmailAddress>() {
            Ok(reply_to) => Some(EmailAddressWithName::from(reply_to)),
            Err(err) => {
                warn!(email = %message.author.email, %err, "cannot use sender address as reply-to");
                None
            }
        };

        let received_at = self
            .time
            .now()
            .with_timezone(&Local)
            .format(RECEIVED_AT_FORMAT)
            .to_string();

        let body = self.template.render(&ContactMessageTemplate {
            name: message.author.name.into_inner(),
            email: message.author.email.into_inner(),
            phone: message.author.phone.map(|phone| phone.into_inner()),
            subject: message.subject.map(|subject| subject.into_inner()),
            message: message.content.into_inner(),
            received_at,
            origin: self.config.origin.to_string(),
        })?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject,
            body,
            content_type: ContentType::Html,
            reply_to,
        };

        match self.email.send(email).await {
            Ok(id) => {
                info!(%id, "contact message forwarded");
                Ok(id)
            }
            Err(EmailSendError::Rejected(err)) => {
                error!(?err, "email provider rejected contact message");
                Err(ContactSendMessageError::Send(err))
            }
            Err(EmailSendError::Other(err)) => Err(err.into()),
        }
    }
}
