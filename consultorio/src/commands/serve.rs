use anyhow::Context;
use consultorio_config::Config;
use consultorio_email_contracts::EmailService;
use tracing::info;

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(provider = ?config.email.provider, "Connecting to email provider");
    let email = email::connect(&config.email)?;
    email
        .ping()
        .await
        .context("Email provider is not reachable")?;

    let server = environment::rest_server(&config, email)?;
    info!("Starting http server on {}", config.http.address);
    server.serve().await
}
