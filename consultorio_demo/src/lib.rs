use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use consultorio_models::email_id::EmailId;

pub mod contact;

pub const EMAIL_ID_1: &str = "abc123";
pub const EMAIL_ID_2: &str = "4ef9a1f2-5cbb-4b8f-9c4a-0d7f0c1e2a77";

pub static EMAIL_ID1: LazyLock<EmailId> = LazyLock::new(|| EMAIL_ID_1.to_owned().into());
pub static EMAIL_ID2: LazyLock<EmailId> = LazyLock::new(|| EMAIL_ID_2.to_owned().into());

pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.with_ymd_and_hms(2026, 10, 17, 17, 3, 22).unwrap());

pub const RECIPIENT: &str = "kelly.amorim@kellyamorim.com.br";
pub const SUBJECT_PREFIX: &str = "Nova mensagem do site: ";
pub const DEFAULT_SUBJECT: &str = "Contato";
pub const ORIGIN: &str = "Site Kelly Amorim - Formulário de Contato";
