use anyhow::Result;
use axum::Json;

use crate::api::dto::ApiResponse;
use crate::domain::stats::selection::SelectionError;
use crate::errors::{internal_error, AppError};

/// Map a domain `Result<T>` into `Json<ApiResponse<T>>`. Rejected input
/// becomes a 400, anything else a 500.
pub fn to_json<T: serde::Serialize>(result: Result<T>) -> Result<Json<ApiResponse<T>>, AppError> {
    match result {
        Ok(value) => Ok(Json(ApiResponse::ok(value))),
        Err(err) if is_bad_request(&err) => Err(AppError::BadRequest(err.to_string())),
        Err(err) => Err(internal_error(err)),
    }
}

fn is_bad_request(err: &anyhow::Error) -> bool {
    err.downcast_ref::<validator::ValidationErrors>().is_some()
        || err.downcast_ref::<SelectionError>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn validation_failures_map_to_bad_request() {
        let err = anyhow::Error::new(validator::ValidationErrors::new());
        let response = to_json::<()>(Err(err)).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_failures_map_to_internal_error() {
        let response = to_json::<()>(Err(anyhow::anyhow!("disk gone")))
            .unwrap_err()
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
