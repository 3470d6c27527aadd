use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use consultorio_core_contact_contracts::{ContactSendMessageError, ContactService};
use consultorio_models::contact::{ContactFormData, ContactMessage, ContactValidationError};

use super::{error, error_with_details, internal_server_error};
use crate::models::contact::{ApiContactMessage, ApiSendEmailResponse};

pub const SEND_EMAIL_ROUTE: &str = "/api/send-email";

const SENT: &str = "E-mail enviado com sucesso!";
const MISSING_REQUIRED_FIELDS: &str = "Nome, e-mail e mensagem são obrigatórios";
const INVALID_EMAIL: &str = "E-mail inválido";
const SEND_FAILED: &str = "Erro ao enviar e-mail. Tente novamente mais tarde.";

struct ContactState<Contact> {
    service: Arc<Contact>,
    error_details: bool,
}

pub fn router(service: Arc<impl ContactService>, error_details: bool) -> Router<()> {
    Router::new()
        .route(SEND_EMAIL_ROUTE, routing::post(send_message))
        .with_state(Arc::new(ContactState {
            service,
            error_details,
        }))
}

/// The body is parsed by hand so that an unreadable or oversized body and malformed
/// json are reported like any other internal error instead of axum's plain text
/// rejection.
async fn send_message(
    state: State<Arc<ContactState<impl ContactService>>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            return internal_server_error(
                anyhow::Error::new(err).context("Failed to read request body"),
                state.error_details,
            )
        }
    };

    let message = match serde_json::from_slice::<ApiContactMessage>(&body) {
        Ok(message) => message,
        Err(err) => {
            return internal_server_error(
                anyhow::Error::new(err).context("Failed to parse request body"),
                state.error_details,
            )
        }
    };

    let message = match ContactMessage::try_from(ContactFormData::from(message)) {
        Ok(message) => message,
        Err(ContactValidationError::MissingRequiredFields) => {
            return error(StatusCode::BAD_REQUEST, MISSING_REQUIRED_FIELDS)
        }
        Err(ContactValidationError::InvalidEmail) => {
            return error(StatusCode::BAD_REQUEST, INVALID_EMAIL)
        }
    };

    match state.service.send_message(message).await {
        Ok(id) => Json(ApiSendEmailResponse {
            success: true,
            message: SENT,
            email_id: Some(id),
        })
        .into_response(),
        Err(ContactSendMessageError::Send(err)) => {
            tracing::error!(?err, "failed to send contact message");
            let details = state
                .error_details
                .then(|| serde_json::to_value(&err).ok())
                .flatten();
            error_with_details(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED, details)
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err, state.error_details),
    }
}
