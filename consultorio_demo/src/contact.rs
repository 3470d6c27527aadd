//! Contact form submissions used across tests.

use std::sync::LazyLock;

use consultorio_models::contact::{ContactFormData, ContactMessage};

/// Only the required fields.
pub static ANA: LazyLock<ContactFormData> = LazyLock::new(|| ContactFormData {
    name: "Ana".into(),
    email: "ana@example.com".into(),
    phone: String::new(),
    subject: String::new(),
    message: "Olá".into(),
});

/// Every field, with a multi-line message.
pub static BRUNO: LazyLock<ContactFormData> = LazyLock::new(|| ContactFormData {
    name: "Bruno Costa".into(),
    email: "bruno.costa@example.com.br".into(),
    phone: "11999999999".into(),
    subject: "Terapia de casal".into(),
    message: "Olá, Dra. Kelly!\nGostaria de agendar uma sessão.\nObrigado.".into(),
});

pub static ANA_MESSAGE: LazyLock<ContactMessage> =
    LazyLock::new(|| ANA.clone().try_into().unwrap());

pub static BRUNO_MESSAGE: LazyLock<ContactMessage> =
    LazyLock::new(|| BRUNO.clone().try_into().unwrap());
