use anyhow::Context;
use consultorio_config::{EmailConfig, EmailProvider};
use consultorio_email_impl::{
    resend::DEFAULT_ENDPOINT, EmailServiceImpl, ResendEmailServiceConfig,
    ResendEmailServiceImpl, SmtpEmailServiceImpl,
};
use url::Url;

/// Set up the configured email provider
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    match config.provider {
        EmailProvider::Resend => {
            let endpoint = match &config.resend.endpoint {
                Some(endpoint) => endpoint.clone(),
                None => Url::parse(DEFAULT_ENDPOINT)?,
            };
            ResendEmailServiceImpl::new(ResendEmailServiceConfig {
                endpoint,
                api_key: config.resend.api_key.clone(),
                from: config.from.clone(),
            })
            .map(Into::into)
            .context("Failed to set up Resend client")
        }
        EmailProvider::Smtp => SmtpEmailServiceImpl::new(&config.smtp.url, config.from.clone())
            .map(Into::into)
            .context("Failed to set up SMTP transport"),
    }
}

#[cfg(test)]
mod tests {
    use consultorio_config::{ResendConfig, SmtpConfig};
    use consultorio_utils::assert_matches;

    use super::*;

    fn config(provider: EmailProvider, api_key: &str) -> EmailConfig {
        EmailConfig {
            from: "Contato Kelly Amorim <contato@kellyamorim.com.br>"
                .parse()
                .unwrap(),
            provider,
            resend: ResendConfig {
                api_key: api_key.into(),
                endpoint: None,
            },
            smtp: SmtpConfig {
                url: "smtp://127.0.0.1:2525".into(),
            },
        }
    }

    #[test]
    fn resend() {
        let result = connect(&config(EmailProvider::Resend, "re_test"));
        assert_matches!(result, Ok(EmailServiceImpl::Resend(_)));
    }

    #[test]
    fn resend_without_api_key() {
        let result = connect(&config(EmailProvider::Resend, ""));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn smtp() {
        let result = connect(&config(EmailProvider::Smtp, ""));
        assert_matches!(result, Ok(EmailServiceImpl::Smtp(_)));
    }
}
