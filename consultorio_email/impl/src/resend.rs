//! Client for the [Resend](https://resend.com/docs/api-reference) transactional
//! email API.

use std::{fmt, sync::Arc};

use anyhow::{anyhow, Context};
use consultorio_email_contracts::{
    ContentType, Email, EmailSendError, EmailService, ProviderError,
};
use consultorio_models::{email_address::EmailAddressWithName, email_id::EmailId};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::http::HttpClient;

pub const DEFAULT_ENDPOINT: &str = "https://api.resend.com/";

/// Returned by `GET /domains` when the key is only allowed to send emails.
const RESTRICTED_API_KEY: &str = "restricted_api_key";

#[derive(Debug, Clone)]
pub struct ResendEmailServiceImpl {
    client: HttpClient,
    config: Arc<ResendEmailServiceConfig>,
}

#[derive(Clone)]
pub struct ResendEmailServiceConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub from: EmailAddressWithName,
}

impl fmt::Debug for ResendEmailServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendEmailServiceConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl ResendEmailServiceImpl {
    pub fn new(config: ResendEmailServiceConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(!config.api_key.is_empty(), "Resend api key is not set");

        Ok(Self {
            client: HttpClient::new().context("Failed to build http client")?,
            config: config.into(),
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.config
            .endpoint
            .join(path)
            .with_context(|| format!("Invalid Resend endpoint {}", self.config.endpoint))
    }
}

impl EmailService for ResendEmailServiceImpl {
    async fn send(&self, email: Email) -> Result<EmailId, EmailSendError> {
        let (html, text) = match email.content_type {
            ContentType::Html => (Some(email.body.as_str()), None),
            ContentType::Text => (None, Some(email.body.as_str())),
        };
        let request = SendEmailRequest {
            from: self.config.from.to_string(),
            to: [email.recipient.to_string()],
            subject: &email.subject,
            html,
            text,
            reply_to: email.reply_to.as_ref().map(ToString::to_string),
        };

        let response = self
            .client
            .post(self.url("emails")?)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the Resend api")?;

        if !response.status().is_success() {
            return Err(EmailSendError::Rejected(provider_error(response).await));
        }

        let SendEmailResponse { id } = response
            .json()
            .await
            .context("Failed to parse Resend response")?;
        debug!(%id, "email accepted by Resend");

        Ok(id.into())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .get(self.url("domains")?)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .context("Failed to reach the Resend api")?;

        if response.status().is_success() {
            return Ok(());
        }

        let error = provider_error(response).await;
        if error.name.as_deref() == Some(RESTRICTED_API_KEY) {
            warn!("Resend api key is restricted to sending emails, skipping domain check");
            return Ok(());
        }

        Err(anyhow!("Resend rejected the api key: {error}"))
    }
}

/// Read the error body Resend sends with every non-2xx response, falling back to the
/// status line if the body is not the documented json object.
async fn provider_error(response: Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => ProviderError {
            code: Some(error.status_code.unwrap_or(status.as_u16())),
            name: error.name,
            message: error.message,
        },
        Err(_) => ProviderError {
            code: Some(status.as_u16()),
            name: None,
            message: status
                .canonical_reason()
                .map(Into::into)
                .unwrap_or_else(|| StatusCode::as_str(&status).into()),
        },
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [String; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<String>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status_code: Option<u16>,
    name: Option<String>,
    message: String,
}
