use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Router,
};
use consultorio_core_contact_contracts::ContactService;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

mod middlewares;
mod models;
mod routes;

pub use routes::contact::SEND_EMAIL_ROUTE;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    config: Arc<RestServerConfig>,
    contact: Contact,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub address: SocketAddr,
    /// Include internal error details in 500 responses.
    pub error_details: bool,
    /// Origins allowed to submit the contact form from a browser. `*` allows any
    /// origin.
    pub allowed_origins: Vec<String>,
    pub body_limit: usize,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Clone)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactService,
{
    pub fn new(config: RestServerConfig, contact: Contact) -> Self {
        Self {
            config: config.into(),
            contact,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let address = self.config.address;
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind to {address}"))?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener, e.g. one on a random port.
    pub async fn serve_on(self, listener: TcpListener) -> anyhow::Result<()> {
        let router = self.router()?;
        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> anyhow::Result<Router<()>> {
        let config = self.config;

        let router = Router::new()
            .merge(routes::contact::router(
                self.contact.into(),
                config.error_details,
            ))
            .layer(DefaultBodyLimit::max(config.body_limit))
            .layer(cors(&config.allowed_origins)?);

        let router = middlewares::panic_handler::add(config.error_details)(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::client_ip::add(config.real_ip.clone().map(Arc::new))(router);
        let router = middlewares::request_id::add(router);

        Ok(router)
    }
}

fn cors(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid allowed origin {origin:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_invalid_origin() {
        assert!(cors(&["http://localhost:3000".into()]).is_ok());
        assert!(cors(&["*".into()]).is_ok());
        assert!(cors(&["http://local\nhost".into()]).is_err());
    }
}
