//! Caller identity extraction.
//!
//! The session layer in front of the API authenticates the user and forwards
//! the result as headers; this extractor only reads them.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::engine::{Caller, Role};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the caller's employee id.
pub const EMPLOYEE_ID_HEADER: &str = "x-employee-id";

/// Header carrying the caller's role, `admin` or `employee`.
pub const ROLE_HEADER: &str = "x-role";

/// The [`Caller`] a request runs on behalf of.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let employee_id = header_value(parts, EMPLOYEE_ID_HEADER)?;
        let role: Role = header_value(parts, ROLE_HEADER)?.parse()?;
        Ok(Self(Caller { employee_id, role }))
    }
}

fn header_value(parts: &Parts, name: &str) -> Result<String, ApiErrorResponse> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiErrorResponse::new(StatusCode::UNAUTHORIZED, ApiError::unauthenticated(name)))
}
