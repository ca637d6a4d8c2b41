//! Extractors whose rejections render as [`platform_api::ErrorDetails`].
//!
//! Unreadable bodies and unparsable path segments are reported like any other
//! unexpected failure: status 500 with the rejection text as the message.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, OriginalUri, Path, Request},
    http::{Extensions, Uri, request::Parts},
};
use platform_api::{ApiError, ApiErrorResponse};

use super::error::request_context;

/// `Json<T>` with an enveloped rejection.
pub struct ApiJson<T>(pub T);

/// `Path<T>` with an enveloped rejection.
pub struct ApiPath<T>(pub T);

fn request_uri(extensions: &Extensions, uri: &Uri) -> Uri {
    extensions
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| uri.clone())
}

fn unreadable(text: String, uri: &Uri) -> ApiErrorResponse {
    ApiError::internal(anyhow!(text)).with_context(request_context(uri))
}

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let uri = request_uri(req.extensions(), req.uri());
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| unreadable(rejection.body_text(), &uri))?;
        Ok(Self(value))
    }
}

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = axum::extract::rejection::PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(unreadable(
                rejection.body_text(),
                &request_uri(&parts.extensions, &parts.uri),
            )),
        }
    }
}
