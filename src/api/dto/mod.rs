//! API DTOs

pub mod ticket_stats_dto;

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Envelope around every API payload.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub is_successful: bool,
    pub data: Option<T>,
    pub error_msg: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            is_successful: true,
            data: Some(data),
            error_msg: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            is_successful: false,
            data: None,
            error_msg: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_camel_case_and_omits_empty_fields() {
        let ok = serde_json::to_value(ApiResponse::ok(vec![1])).unwrap();
        assert_eq!(ok, serde_json::json!({ "isSuccessful": true, "data": [1] }));

        let err = serde_json::to_value(ApiResponse::<()>::err("boom")).unwrap();
        assert_eq!(err, serde_json::json!({ "isSuccessful": false, "errorMsg": "boom" }));
    }
}
