use clap::Subcommand;
use consultorio_config::Config;
use consultorio_email_contracts::{ContentType, Email, EmailService};
use consultorio_models::email_address::EmailAddressWithName;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email)?;

    let id = email_service
        .send(Email {
            recipient,
            subject: "Teste de envio de e-mail".into(),
            body: "O envio de e-mails parece estar funcionando!".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await?;

    println!("Email sent with id {id}");

    Ok(())
}
