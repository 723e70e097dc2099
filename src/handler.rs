use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use serde_json::json;

use std::sync::Arc;

use crate::dto::{ContactRequest, ContactResponse};
use crate::service::{ContactError, ContactService};

fn failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ContactResponse {
            success: false,
            message,
        }),
    )
        .into_response()
}

#[debug_handler]
pub async fn contact(
    State(service): State<Arc<ContactService>>,
    Json(payload): Json<ContactRequest>,
) -> Response {
    match service.submit(payload).await {
        Ok(r) => (StatusCode::OK, Json(r)).into_response(),
        Err(e @ ContactError::MissingFields) => failure(StatusCode::BAD_REQUEST, e.to_string()),
        Err(ContactError::Authentication(diag)) => {
            tracing::error!("SMTP authentication rejected: {diag}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Email server authentication failed. Please check your credentials.".to_string(),
            )
        }
        Err(ContactError::Relay(diag)) => {
            tracing::error!("SMTP relay failure: {diag}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Email server error: {diag}"),
            )
        }
        Err(ContactError::Unexpected(diag)) => {
            tracing::error!("Unexpected failure while relaying contact submission: {diag}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {diag}"),
            )
        }
    }
}

#[debug_handler]
pub async fn api_info() -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Portfolio Backend API is running!",
            "endpoints": {
                "POST /contact": "Submit contact form"
            }
        })),
    )
        .into_response()
}
