//! Request extractors.
//!
//! Every rejection renders through [`ApiError`], so clients always see the
//! same `{code, message, details, retryable}` body.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::application::ports::{AuthError, IdentityPort, MarketplaceStore};
use crate::domain::identity::Principal;
use crate::error::ApiError;

use super::controller::AppState;

/// Bearer token from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<St> FromRequestParts<St> for BearerToken
where
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        Ok(Self(token.to_string()))
    }
}

/// An authenticated caller.
///
/// Add as a handler parameter to require a valid session.
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Who is calling.
    pub principal: Principal,
    /// The presented token, kept for logout.
    pub token: String,
}

impl<S, I> FromRequestParts<AppState<S, I>> for Authenticated
where
    S: MarketplaceStore,
    I: IdentityPort,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, I>,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let principal = state.identity.authenticate(&token).await?;
        Ok(Self { principal, token })
    }
}

/// JSON body whose rejection is an `INVALID_REQUEST` error.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<St, T> FromRequest<St> for ApiJson<T>
where
    Json<T>: FromRequest<St, Rejection = JsonRejection>,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

impl<T: DeserializeOwned> ApiJson<T> {
    /// Parse a body taken as raw bytes, for handlers that authorize the
    /// caller before reading the payload.
    pub fn parse(body: &[u8]) -> Result<T, ApiError> {
        Json::<T>::from_bytes(body)
            .map(|Json(value)| value)
            .map_err(|rejection| ApiError::invalid_request(rejection.body_text()))
    }
}

/// Path parameters whose rejection is an `INVALID_REQUEST` error.
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<St, T> FromRequestParts<St> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    St: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| ApiError::invalid_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}
