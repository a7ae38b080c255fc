use async_graphql::{Error, ErrorExtensions};
use platform_api::ApiError;
use products_hr::HrError;

fn api_error(err: HrError) -> ApiError {
    match err {
        // A stale session that no longer resolves is treated as logged out.
        HrError::UnknownEmployee(_) => ApiError::Unauthorized,
        HrError::NotFound { .. } => ApiError::NotFound,
        HrError::Forbidden(err) => err.into(),
        HrError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        err @ HrError::NoAttendanceToday => ApiError::InvalidInput(err.to_string()),
    }
}

/// Map a domain error straight into a GraphQL error with its code attached.
pub fn hr_error(err: HrError) -> Error {
    api_error(err).extend()
}
