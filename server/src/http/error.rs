//! Translation of HR failures into the uniform API error payload.

use axum::http::Uri;
use platform_api::{ApiError, ApiErrorResponse};
use products_hr::HrError;

/// Map a domain error onto its transport category.
pub fn translate(err: HrError) -> ApiError {
    let message = err.to_string();
    match err {
        HrError::ResourceNotFound(_) => ApiError::NotFound(message),
        HrError::DuplicateEntry(_) => ApiError::Conflict(message),
        HrError::InternalFailure(source) => ApiError::internal(source),
    }
}

/// `uri=/employees/7`, the request description carried in `details`.
pub fn request_context(uri: &Uri) -> String {
    format!("uri={}", uri.path())
}

pub fn reject(err: HrError, uri: &Uri) -> ApiErrorResponse {
    translate(err).with_context(request_context(uri))
}
