use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::models::ApiError;

pub mod contact;

const INTERNAL_SERVER_ERROR: &str = "Erro interno do servidor. Tente novamente mais tarde.";

pub fn internal_server_error(err: impl Into<anyhow::Error>, error_details: bool) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error_with_details(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR,
        error_details.then(|| Value::String(format!("{err:#}"))),
    )
}

fn error(code: StatusCode, error: &'static str) -> Response {
    error_with_details(code, error, None)
}

fn error_with_details(code: StatusCode, error: &'static str, details: Option<Value>) -> Response {
    (code, Json(ApiError { error, details })).into_response()
}
