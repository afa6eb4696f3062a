//! Route handlers and the JSON and query extractors that turn rejections
//! into 422 responses.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde_json::Value;

use crate::{
    error::ApiError,
    metadata::PKG_NAME,
    server::ServerState,
    tools::{self, DEFAULT_DECIMAL_PLACES},
    types::{
        EchoRequest, EchoResponse, FormatNumberRequest, FormatNumberResponse, HealthParams,
        HealthResponse, WelcomeResponse,
    },
};

/// `Json<T>` whose rejections are reported as validation errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ApiError::PayloadTooLarge(rejection.body_text()))
            }
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

/// `Query<T>` whose rejections are reported as validation errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to the {PKG_NAME} API"),
    })
}

pub async fn echo(ValidatedJson(req): ValidatedJson<EchoRequest>) -> Json<EchoResponse> {
    tracing::debug!(len = req.message.len(), "echo");
    Json(EchoResponse {
        message: tools::echo(req.message),
    })
}

pub async fn format_number(
    ValidatedJson(req): ValidatedJson<FormatNumberRequest>,
) -> Result<Json<FormatNumberResponse>, ApiError> {
    let decimal_places = req.decimal_places.unwrap_or(DEFAULT_DECIMAL_PLACES);
    let formatted = tools::format_number_with(req.value, decimal_places)?;
    tracing::debug!(value = req.value, %formatted, "format-number");
    Ok(Json(FormatNumberResponse { formatted }))
}

pub async fn health(
    State(state): State<Arc<ServerState>>,
    ValidatedQuery(params): ValidatedQuery<HealthParams>,
) -> Json<HealthResponse> {
    Json(tools::health_summary(&state, params.verbose))
}

pub async fn openapi(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(state.openapi.clone())
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
