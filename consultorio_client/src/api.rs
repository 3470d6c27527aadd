use std::future::Future;

use anyhow::Context;
use consultorio_models::{contact::ContactFormData, email_id::EmailId};
use consultorio_utils::consultorio_version;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ContactApiService: Send + Sync + 'static {
    /// Post the form to the contact endpoint and return the id of the email the
    /// server sent, if it reported one.
    fn send(
        &self,
        form: ContactFormData,
    ) -> impl Future<Output = Result<Option<EmailId>, ContactApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactApiError {
    /// The server answered with a non-success status.
    #[error("Contact api responded with status {status}")]
    Rejected {
        status: u16,
        /// The `error` field of the response body.
        message: Option<String>,
    },
    /// No usable response was received.
    #[error(transparent)]
    Connection(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ContactApiServiceImpl {
    client: reqwest::Client,
    endpoint: Url,
}

impl ContactApiServiceImpl {
    pub fn new(endpoint: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("consultorio-client/{}", consultorio_version()))
            .build()
            .context("Failed to build http client")?;

        Ok(Self { client, endpoint })
    }
}

impl ContactApiService for ContactApiServiceImpl {
    async fn send(&self, form: ContactFormData) -> Result<Option<EmailId>, ContactApiError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&form)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.endpoint))?;

        let status = response.status();
        let body = response.json::<ApiResponse>().await.ok();

        if status.is_success() {
            Ok(body.and_then(|body| body.email_id))
        } else {
            Err(ContactApiError::Rejected {
                status: status.as_u16(),
                message: body.and_then(|body| body.error),
            })
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    error: Option<String>,
    email_id: Option<EmailId>,
}

#[cfg(any(test, feature = "mock"))]
impl MockContactApiService {
    pub fn with_send(
        mut self,
        form: ContactFormData,
        result: Result<Option<EmailId>, ContactApiError>,
    ) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(form))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
