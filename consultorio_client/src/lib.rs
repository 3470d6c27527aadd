//! Client side of the contact form.
//!
//! [`ContactFormController`] holds what the visitor typed, checks the required
//! fields before touching the network and reports its progress as a
//! [`FormStatus`] that a UI can watch.

use consultorio_models::contact::ContactFormData;
use tokio::sync::watch;
use tracing::{info, warn};

pub use crate::api::{ContactApiError, ContactApiService, ContactApiServiceImpl};
#[cfg(feature = "mock")]
pub use crate::api::MockContactApiService;

mod api;

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Por favor, preencha os campos obrigatórios: Nome, E-mail e Mensagem.";
pub const SENDING_MESSAGE: &str = "Enviando mensagem...";
pub const SENT_MESSAGE: &str = "Mensagem enviada com sucesso! Retornarei o contato em breve.";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Erro de conexão. Verifique sua internet e tente novamente.";
pub const FALLBACK_ERROR_MESSAGE: &str = "Erro ao enviar mensagem. Tente novamente.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStatus {
    pub kind: FormStatusKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatusKind {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl FormStatus {
    fn new(kind: FormStatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the submit button should be enabled in this state.
    pub fn allows_submit(&self) -> bool {
        self.kind != FormStatusKind::Loading
    }
}

#[derive(Debug)]
pub struct ContactFormController<Api> {
    api: Api,
    fields: ContactFormData,
    status: watch::Sender<FormStatus>,
}

impl<Api> ContactFormController<Api>
where
    Api: ContactApiService,
{
    pub fn new(api: Api) -> Self {
        Self {
            api,
            fields: ContactFormData::default(),
            status: watch::Sender::new(FormStatus::default()),
        }
    }

    pub fn fields(&self) -> &ContactFormData {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut ContactFormData {
        &mut self.fields
    }

    pub fn status(&self) -> FormStatus {
        self.status.borrow().clone()
    }

    /// Receive every status change, including the transition to loading while a
    /// submission is in flight.
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        self.status.borrow().allows_submit()
    }

    /// Send the form. Never retries; the resulting status describes the outcome.
    pub async fn submit(&mut self) {
        if !self.can_submit() {
            return;
        }

        if !self.fields.has_required_fields() {
            self.status.send_replace(FormStatus::new(
                FormStatusKind::Error,
                REQUIRED_FIELDS_MESSAGE,
            ));
            return;
        }

        self.status
            .send_replace(FormStatus::new(FormStatusKind::Loading, SENDING_MESSAGE));
        let mut in_flight = InFlight(Some(&self.status));

        let result = self.api.send(self.fields.clone()).await;
        in_flight.0 = None;

        let status = match result {
            Ok(email_id) => {
                info!(?email_id, "contact form sent");
                self.fields = ContactFormData::default();
                FormStatus::new(FormStatusKind::Success, SENT_MESSAGE)
            }
            Err(ContactApiError::Rejected { status, message }) => {
                warn!(status, ?message, "contact form rejected");
                FormStatus::new(
                    FormStatusKind::Error,
                    message.unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.into()),
                )
            }
            Err(ContactApiError::Connection(err)) => {
                warn!("failed to send contact form: {err:#}");
                FormStatus::new(FormStatusKind::Error, CONNECTION_ERROR_MESSAGE)
            }
        };
        self.status.send_replace(status);
    }
}

/// Resets the status to idle if a submission is dropped before the server
/// answered, so the form does not stay disabled.
struct InFlight<'a>(Option<&'a watch::Sender<FormStatus>>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(status) = self.0 {
            status.send_replace(FormStatus::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use consultorio_demo::{contact::ANA, EMAIL_ID1};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::MockContactApiService;

    fn controller(
        api: MockContactApiService,
        form: &ContactFormData,
    ) -> ContactFormController<MockContactApiService> {
        let mut sut = ContactFormController::new(api);
        *sut.fields_mut() = form.clone();
        sut
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let api =
            MockContactApiService::new().with_send(ANA.clone(), Ok(Some(EMAIL_ID1.clone())));
        let mut sut = controller(api, &ANA);
        let mut status = sut.subscribe();

        // Act
        sut.submit().await;

        // Assert
        assert_eq!(
            sut.status(),
            FormStatus::new(FormStatusKind::Success, SENT_MESSAGE)
        );
        assert_eq!(*sut.fields(), ContactFormData::default());
        assert!(status.has_changed().unwrap());
        assert_eq!(status.borrow_and_update().kind, FormStatusKind::Success);
        assert!(sut.can_submit());
    }

    #[tokio::test]
    async fn missing_required_fields() {
        for form in [
            ContactFormData {
                name: String::new(),
                ..ANA.clone()
            },
            ContactFormData {
                email: " ".into(),
                ..ANA.clone()
            },
            ContactFormData {
                message: "\n".into(),
                ..ANA.clone()
            },
        ] {
            // Arrange
            let mut sut = controller(MockContactApiService::new(), &form);

            // Act
            sut.submit().await;

            // Assert
            assert_eq!(
                sut.status(),
                FormStatus::new(FormStatusKind::Error, REQUIRED_FIELDS_MESSAGE)
            );
            assert_eq!(*sut.fields(), form);
        }
    }

    #[tokio::test]
    async fn server_error_message() {
        // Arrange
        let api = MockContactApiService::new().with_send(
            ANA.clone(),
            Err(ContactApiError::Rejected {
                status: 400,
                message: Some("E-mail inválido".into()),
            }),
        );
        let mut sut = controller(api, &ANA);

        // Act
        sut.submit().await;

        // Assert
        assert_eq!(
            sut.status(),
            FormStatus::new(FormStatusKind::Error, "E-mail inválido")
        );
        assert_eq!(*sut.fields(), *ANA);
    }

    #[tokio::test]
    async fn server_error_without_message() {
        // Arrange
        let api = MockContactApiService::new().with_send(
            ANA.clone(),
            Err(ContactApiError::Rejected {
                status: 502,
                message: None,
            }),
        );
        let mut sut = controller(api, &ANA);

        // Act
        sut.submit().await;

        // Assert
        assert_eq!(
            sut.status(),
            FormStatus::new(FormStatusKind::Error, FALLBACK_ERROR_MESSAGE)
        );
        assert_eq!(*sut.fields(), *ANA);
    }

    #[tokio::test]
    async fn connection_error() {
        // Arrange
        let api = MockContactApiService::new().with_send(
            ANA.clone(),
            Err(anyhow::anyhow!("connection refused").into()),
        );
        let mut sut = controller(api, &ANA);

        // Act
        sut.submit().await;

        // Assert
        assert_eq!(
            sut.status(),
            FormStatus::new(FormStatusKind::Error, CONNECTION_ERROR_MESSAGE)
        );
        assert_eq!(*sut.fields(), *ANA);
    }

    #[tokio::test]
    async fn loading_while_in_flight() {
        // Arrange
        let mut api = MockContactApiService::new();
        api.expect_send()
            .once()
            .return_once(|_| Box::pin(pending()));
        let mut sut = controller(api, &ANA);
        let mut status = sut.subscribe();

        // Act
        let mut submit = Box::pin(sut.submit());
        let poll = futures::poll!(&mut submit);

        // Assert
        assert!(poll.is_pending());
        assert!(status.has_changed().unwrap());
        let loading = status.borrow_and_update().clone();
        assert_eq!(
            loading,
            FormStatus::new(FormStatusKind::Loading, SENDING_MESSAGE)
        );
        assert!(!loading.allows_submit());

        drop(submit);
        assert_eq!(sut.status(), FormStatus::default());
        assert!(sut.can_submit());
        assert_eq!(*sut.fields(), *ANA);
    }
}
