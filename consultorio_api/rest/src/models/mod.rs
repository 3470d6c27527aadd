use serde::Serialize;
use serde_json::Value;

pub mod contact;

#[derive(Serialize)]
pub struct ApiError {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
