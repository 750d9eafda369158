use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::Rejection;

/// The uniform body returned by `POST /`, whatever happened.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LookupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl LookupResponse {
    pub fn success(data: Value) -> Self {
        LookupResponse {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        LookupResponse {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

impl From<Result<Value, Rejection>> for LookupResponse {
    fn from(result: Result<Value, Rejection>) -> Self {
        match result {
            Ok(member) => LookupResponse::success(member),
            Err(rejection) => LookupResponse::failure(rejection.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_without_error_field() {
        let body = serde_json::to_value(LookupResponse::success(json!({"memberId": 42}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"memberId": 42}}));
    }

    #[test]
    fn rejection_serializes_without_data_field() {
        let body = serde_json::to_value(LookupResponse::from(Err(Rejection::ChallengeFailed))).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "Security challenge failed."})
        );
    }

    #[test]
    fn empty_member_is_still_a_success() {
        let response = LookupResponse::from(Ok(json!({})));
        assert!(response.success);
        assert_eq!(response.data, Some(json!({})));
    }
}
