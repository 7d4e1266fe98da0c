//! The single query endpoint
//!
//! Every operation goes through `POST /graphql`. A present but invalid bearer
//! token is rejected with 401 before the operation runs; operation failures
//! come back as `errors` in a 200 response.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use dahlia_core::{Error, Operation, OperationOutput};

use super::AppState;

/// Response envelope
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OperationOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,
}

#[derive(Debug, Serialize)]
pub struct QueryError {
    pub message: String,
    pub code: &'static str,
}

impl From<&Error> for QueryError {
    fn from(err: &Error) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
        }
    }
}

/// API error response for requests rejected before dispatch
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    fn unauthorized(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            code: err.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

pub async fn query(
    State(gateway): State<AppState>,
    headers: HeaderMap,
    Json(operation): Json<Operation>,
) -> Result<Json<QueryResponse>, ApiError> {
    let authorization = match headers.get(header::AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::unauthorized(&Error::InvalidToken))?,
        ),
        None => None,
    };

    let ctx = gateway.authenticate(authorization).map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        ApiError::unauthorized(&e)
    })?;

    let name = operation.name();
    let response = match gateway.execute(operation, &ctx).await {
        Ok(output) => QueryResponse {
            data: Some(output),
            errors: Vec::new(),
        },
        Err(e) => {
            if e.is_internal() {
                log::error!("Operation {} failed: {}", name, e);
            } else {
                log::debug!("Operation {} rejected: {}", name, e);
            }
            QueryResponse {
                data: None,
                errors: vec![QueryError::from(&e)],
            }
        }
    };

    Ok(Json(response))
}

pub async fn health() -> &'static str {
    "ok"
}
