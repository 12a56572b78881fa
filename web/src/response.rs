//! Success envelope.
//!
//! Every successful response is `{"success": true, "data": ...}`; list
//! responses add `"count"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Successful JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// `200 OK` with `data`.
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
            status: StatusCode::OK,
        }
    }

    /// `201 Created` with `data`.
    pub const fn created(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// `200 OK` with a list and its length.
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data,
            status: StatusCode::OK,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// `200 OK` with an empty object, for deletions.
    #[must_use]
    pub fn empty() -> Self {
        Self::ok(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
