//! HTTP-facing error taxonomy.
//!
//! # Design
//! Three outcomes reach the client: a validation failure (400), a missing
//! item (404) and a storage failure (500). Storage failures are logged with
//! their source here and the caller only ever sees [`STORAGE_FAILURE`].
//! Every error body has the same `{"message": ...}` shape.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::store::StoreError;

pub const STORAGE_FAILURE: &str = "何らかの問題が発生しました。再度実行してください。";
pub const ITEM_NOT_FOUND: &str = "タスクが存在しません";
pub const DELETE_TARGET_NOT_FOUND: &str = "削除対象が見つかりませんでした。";

/// JSON body of every error response.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The request was well-formed HTTP but its content was rejected.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl AppError {
    /// Map a storage error, turning "no such row" into a 404 with `message`.
    pub fn from_store(err: StoreError, message: &str) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(message.to_string()),
            other => AppError::Storage(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Validation(message) | AppError::NotFound(message) => message,
            AppError::Storage(err) => {
                tracing::error!(error = %err, "storage operation failed");
                STORAGE_FAILURE.to_string()
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
