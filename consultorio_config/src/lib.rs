use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    path::Path,
};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use consultorio_models::email_address::EmailAddressWithName;
use serde::Deserialize;
use url::Url;

/// Colon separated list of additional config files.
pub const CONFIG_PATHS_ENV: &str = "CONSULTORIO_CONFIG";

/// Prefix of environment variables overriding single keys, e.g.
/// `CONSULTORIO__EMAIL__RESEND__API_KEY`.
pub const ENV_PREFIX: &str = "CONSULTORIO";
const ENV_SEPARATOR: &str = "__";

/// Load the config from the built-in defaults, the files listed in
/// `CONSULTORIO_CONFIG` and the process environment, in that order.
pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = paths.split(':').filter(|path| !path.is_empty()).collect::<Vec<_>>();
    load_from(&paths, environment())
}

fn load_from(paths: &[impl AsRef<Path>], environment: Environment) -> anyhow::Result<Config> {
    let defaults = File::from_str(consultorio_assets::CONFIG_TOML, FileFormat::Toml);

    paths
        .iter()
        .try_fold(config::Config::builder().add_source(defaults), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(environment)
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    /// Include internal error details in 500 responses.
    pub error_details: bool,
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    pub real_ip: Option<RealIpConfig>,
}

/// Trust the client ip reported by a reverse proxy.
#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    /// Only requests from this address may set the header.
    pub set_from: IpAddr,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub from: EmailAddressWithName,
    pub provider: EmailProvider,
    pub resend: ResendConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Resend,
    Smtp,
}

#[derive(Deserialize)]
pub struct ResendConfig {
    pub api_key: String,
    pub endpoint: Option<Url>,
}

impl fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ResendConfig")
            .field("api_key", &api_key)
            .field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Inbox receiving the contact form messages.
    pub recipient: EmailAddressWithName,
    pub subject_prefix: String,
    pub default_subject: String,
    pub origin: String,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub endpoint: Url,
}

#[cfg(test)]
mod tests {
    use std::{io::Write, net::Ipv4Addr};

    use config::Map;
    use pretty_assertions::assert_eq;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<Map<_, _>>();
        environment().source(Some(vars))
    }

    #[test]
    fn load_default_config() {
        // Act
        let config = load_from(&[] as &[&Path], env(&[])).unwrap();

        // Assert
        assert_eq!(
            config.http.address,
            SocketAddr::from((Ipv4Addr::LOCALHOST, 8000))
        );
        assert!(!config.http.error_details);
        assert_eq!(config.http.allowed_origins, ["http://localhost:3000"]);
        assert!(config.http.real_ip.is_none());
        assert_eq!(config.email.provider, EmailProvider::Resend);
        assert_eq!(config.email.from.name(), Some("Contato Kelly Amorim"));
        assert_eq!(config.email.from.email(), "contato@kellyamorim.com.br");
        assert_eq!(config.email.resend.api_key, "");
        assert_eq!(config.contact.recipient.email(), "kelly.amorim@kellyamorim.com.br");
        assert_eq!(config.contact.default_subject, "Contato");
        assert_eq!(config.contact.subject_prefix, "Nova mensagem do site: ");
        assert_eq!(
            config.client.endpoint.as_str(),
            "http://127.0.0.1:8000/api/send-email"
        );
    }

    #[test]
    fn environment_overrides() {
        // Act
        let config = load_from(
            &[] as &[&Path],
            env(&[
                ("CONSULTORIO__EMAIL__RESEND__API_KEY", "re_123"),
                ("CONSULTORIO__EMAIL__PROVIDER", "smtp"),
                ("CONSULTORIO__HTTP__ERROR_DETAILS", "true"),
                ("CONSULTORIO__HTTP__BODY_LIMIT", "1024"),
            ]),
        )
        .unwrap();

        // Assert
        assert_eq!(config.email.resend.api_key, "re_123");
        assert_eq!(config.email.provider, EmailProvider::Smtp);
        assert!(config.http.error_details);
        assert_eq!(config.http.body_limit, 1024);
    }

    #[test]
    fn config_files_are_layered() {
        // Arrange
        let path = std::env::temp_dir().join(format!(
            "consultorio-config-test-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
            [http]
            address = "0.0.0.0:80"

            [http.real_ip]
            header = "X-Real-Ip"
            set_from = "10.0.0.1"

            [contact]
            origin = "Teste"
            "#
        )
        .unwrap();

        // Act
        let config = load_from(&[&path], env(&[]));
        std::fs::remove_file(&path).unwrap();
        let config = config.unwrap();

        // Assert
        assert_eq!(config.http.address.port(), 80);
        let real_ip = config.http.real_ip.unwrap();
        assert_eq!(real_ip.header, "X-Real-Ip");
        assert_eq!(real_ip.set_from, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(config.contact.origin, "Teste");
        assert_eq!(config.contact.default_subject, "Contato");
    }

    #[test]
    fn missing_config_file() {
        let result = load_from(&["/nonexistent/consultorio.toml"], env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_provider() {
        let result = load_from(
            &[] as &[&Path],
            env(&[("CONSULTORIO__EMAIL__PROVIDER", "carrier-pigeon")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn resend_api_key_is_redacted() {
        let config = ResendConfig {
            api_key: "re_secret".into(),
            endpoint: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("re_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
