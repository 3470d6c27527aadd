use std::sync::Arc;

use consultorio_api_rest::{RealIpConfig, RestServerConfig};
use consultorio_config::{Config, ContactConfig, HttpConfig};
use consultorio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use consultorio_shared_impl::time::TimeServiceImpl;
use consultorio_templates_impl::TemplateServiceImpl;
use types::{Email, RestServer};

pub mod types;

/// Wire the contact service and the http server around the given email provider.
pub fn rest_server(config: &Config, email: Email) -> anyhow::Result<RestServer> {
    let template = TemplateServiceImpl::new()?;
    let contact = ContactServiceImpl::new(
        email,
        template,
        TimeServiceImpl,
        contact_service_config(&config.contact),
    );

    Ok(RestServer::new(rest_server_config(&config.http), contact))
}

fn rest_server_config(config: &HttpConfig) -> RestServerConfig {
    RestServerConfig {
        address: config.address,
        error_details: config.error_details,
        allowed_origins: config.allowed_origins.clone(),
        body_limit: config.body_limit,
        real_ip: config.real_ip.as_ref().map(|real_ip| RealIpConfig {
            header: real_ip.header.clone(),
            set_from: real_ip.set_from,
        }),
    }
}

fn contact_service_config(config: &ContactConfig) -> ContactServiceConfig {
    ContactServiceConfig {
        recipient: Arc::new(config.recipient.clone()),
        subject_prefix: config.subject_prefix.as_str().into(),
        default_subject: config.default_subject.as_str().into(),
        origin: config.origin.as_str().into(),
    }
}
