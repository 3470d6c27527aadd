use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A bare address such as `contato@kellyamorim.com.br`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

/// An address with an optional display name such as
/// `Contato Kelly Amorim <contato@kellyamorim.com.br>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddressWithName {
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn email(&self) -> &str {
        self.0.email.as_ref()
    }
}

impl From<EmailAddress> for EmailAddressWithName {
    fn from(value: EmailAddress) -> Self {
        Self(lettre::message::Mailbox {
            name: None,
            email: value.0,
        })
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_name() {
        let mailbox = "Contato Kelly Amorim <contato@kellyamorim.com.br>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.name(), Some("Contato Kelly Amorim"));
        assert_eq!(mailbox.email(), "contato@kellyamorim.com.br");
    }

    #[test]
    fn parse_without_name() {
        let mailbox = "kelly.amorim@kellyamorim.com.br"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.name(), None);
        assert_eq!(mailbox.email(), "kelly.amorim@kellyamorim.com.br");
    }

    #[test]
    fn bare_address_rejects_display_name() {
        assert!("x<attacker@evil.com>".parse::<EmailAddress>().is_err());
        assert!("x<attacker@evil.com>".parse::<EmailAddressWithName>().is_ok());

        let mailbox = EmailAddressWithName::from(
            "ana@example.com".parse::<EmailAddress>().unwrap(),
        );
        assert_eq!(mailbox.name(), None);
        assert_eq!(mailbox.email(), "ana@example.com");
    }

    #[test]
    fn parse_invalid() {
        assert!("not an email".parse::<EmailAddress>().is_err());
    }
}
