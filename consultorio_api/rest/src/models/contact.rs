use consultorio_models::{contact::ContactFormData, email_id::EmailId};
use serde::{Deserialize, Serialize};

/// Missing and `null` fields are treated like empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl From<ApiContactMessage> for ContactFormData {
    fn from(value: ApiContactMessage) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            phone: value.phone.unwrap_or_default(),
            subject: value.subject.unwrap_or_default(),
            message: value.message.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSendEmailResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<EmailId>,
}
