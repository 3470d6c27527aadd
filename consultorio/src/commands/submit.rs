use anyhow::bail;
use clap::Args;
use consultorio_client::{ContactApiServiceImpl, ContactFormController, FormStatusKind};
use consultorio_config::Config;
use consultorio_models::contact::ContactFormData;
use url::Url;

/// Fill in the contact form and submit it like the website does
#[derive(Debug, Args)]
pub struct SubmitCommand {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    subject: String,
    #[arg(long, default_value = "")]
    message: String,
    /// Override the contact endpoint from the config
    #[arg(long)]
    endpoint: Option<Url>,
}

impl SubmitCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        let endpoint = self.endpoint.unwrap_or(config.client.endpoint);
        let mut controller = ContactFormController::new(ContactApiServiceImpl::new(endpoint)?);
        *controller.fields_mut() = ContactFormData {
            name: self.name,
            email: self.email,
            phone: self.phone,
            subject: self.subject,
            message: self.message,
        };

        controller.submit().await;

        let status = controller.status();
        match status.kind {
            FormStatusKind::Success => {
                println!("{}", status.message);
                Ok(())
            }
            _ => bail!("{}", status.message),
        }
    }
}
