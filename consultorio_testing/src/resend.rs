//! Minimal fake of the Resend email api.
//!
//! Emails are kept in memory instead of being delivered. Senders on an
//! `unverified.` domain are rejected the same way Resend rejects senders whose
//! domain has not been verified.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use url::Url;
use uuid::Uuid;

pub const EMAILS_ROUTE: &str = "/emails";
pub const DOMAINS_ROUTE: &str = "/domains";

const UNVERIFIED_DOMAIN_PREFIX: &str = "unverified.";

#[derive(Debug, Clone)]
pub struct FakeResend {
    api_key: Arc<str>,
    outbox: Arc<Mutex<Vec<ReceivedEmail>>>,
}

/// An email as posted to `POST /emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedEmail {
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
}

impl FakeResend {
    pub fn new(api_key: impl Into<Arc<str>>) -> Self {
        Self {
            api_key: api_key.into(),
            outbox: Default::default(),
        }
    }

    /// All emails accepted so far, oldest first.
    pub async fn outbox(&self) -> Vec<ReceivedEmail> {
        self.outbox.lock().await.clone()
    }

    pub fn router(self) -> Router<()> {
        Router::new()
            .route(EMAILS_ROUTE, routing::post(send_email))
            .route(DOMAINS_ROUTE, routing::get(list_domains))
            .with_state(self)
    }

    /// Serve the fake on a random local port in a background task and return its
    /// base url.
    pub async fn spawn(self) -> anyhow::Result<Url> {
        let listener = TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .context("Failed to bind fake resend server")?;
        let addr = listener.local_addr()?;

        let router = self.router();
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                tracing::error!("fake resend server failed: {err}");
            }
        });

        base_url(addr)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|key| *key == *self.api_key)
    }
}

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting resend testing server on {host}:{port}");
    info!("Resend endpoint: http://{host}:{port}/");
    info!("Api key: {api_key:?}");
    info!("Senders on an \"{UNVERIFIED_DOMAIN_PREFIX}*\" domain are rejected");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, FakeResend::new(api_key).router())
        .await
        .context("Failed to start HTTP server")
}

async fn send_email(
    state: State<FakeResend>,
    headers: HeaderMap,
    Json(mut email): Json<ReceivedEmail>,
) -> Response {
    if !state.authorized(&headers) {
        return invalid_api_key();
    }

    let domain = email
        .from
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_end_matches('>'))
        .unwrap_or_default();
    if domain.starts_with(UNVERIFIED_DOMAIN_PREFIX) {
        return error(
            StatusCode::FORBIDDEN,
            "validation_error",
            &format!(
                "The {domain} domain is not verified. Please, add and verify your domain."
            ),
        );
    }

    email.id = Uuid::new_v4().to_string();
    info!(id = %email.id, to = ?email.to, subject = %email.subject, "received email");

    let id = email.id.clone();
    state.outbox.lock().await.push(email);

    Json(json!({ "id": id })).into_response()
}

async fn list_domains(state: State<FakeResend>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return invalid_api_key();
    }

    Json(json!({ "data": [] })).into_response()
}

fn invalid_api_key() -> Response {
    error(StatusCode::FORBIDDEN, "validation_error", "API key is invalid")
}

fn error(status: StatusCode, name: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "statusCode": status.as_u16(),
            "name": name,
            "message": message,
        })),
    )
        .into_response()
}

fn base_url(addr: SocketAddr) -> anyhow::Result<Url> {
    format!("http://{addr}/")
        .parse()
        .context("Failed to build fake resend url")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_wrong_api_key() {
        // Arrange
        let fake = FakeResend::new("re_test");
        let url = fake.clone().spawn().await.unwrap();

        // Act
        let response = reqwest::Client::new()
            .get(url.join("domains").unwrap())
            .bearer_auth("re_wrong")
            .send()
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status().as_u16(), 403);
    }

    #[tokio::test]
    async fn stores_emails() {
        // Arrange
        let fake = FakeResend::new("re_test");
        let url = fake.clone().spawn().await.unwrap();

        // Act
        let response = reqwest::Client::new()
            .post(url.join("emails").unwrap())
            .bearer_auth("re_test")
            .json(&json!({
                "from": "Contato <contato@kellyamorim.com.br>",
                "to": ["kelly.amorim@kellyamorim.com.br"],
                "subject": "Oi",
                "html": "<p>Oi</p>",
            }))
            .send()
            .await
            .unwrap();

        // Assert
        assert!(response.status().is_success());
        let outbox = fake.outbox().await;
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].subject, "Oi");
        assert_eq!(outbox[0].reply_to, None);
    }
}
