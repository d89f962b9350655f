//! Response envelope and error-to-status mapping.

use memberbase_core::{CoreError, CoreResult, ErrorKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// Status code plus JSON body, as a transport would send it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn from_result<T: Serialize>(result: CoreResult<T>) -> Self {
        match result.and_then(|value| to_body(&value)) {
            Ok(body) => Self { status: 200, body },
            Err(err) => Self::from_error(&err),
        }
    }

    pub(crate) fn from_error(err: &CoreError) -> Self {
        let kind = err.kind();
        Self {
            status: status_code(kind),
            body: json!({
                "error": error_label(kind),
                "message": err.to_string(),
            }),
        }
    }
}

pub(crate) fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::NotFound => 404,
        ErrorKind::InvalidArgument => 400,
        ErrorKind::PreconditionFailed => 412,
        ErrorKind::Internal => 500,
    }
}

fn error_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "not_found",
        ErrorKind::InvalidArgument => "invalid_argument",
        ErrorKind::PreconditionFailed => "precondition_failed",
        ErrorKind::Internal => "internal",
    }
}

/// Decodes a request body; any shape mismatch is `InvalidArgument`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: Value) -> CoreResult<T> {
    serde_json::from_value(body)
        .map_err(|err| CoreError::InvalidArgument(format!("invalid request body: {err}")))
}

fn to_body<T: Serialize>(value: &T) -> CoreResult<Value> {
    serde_json::to_value(value).map_err(|err| {
        CoreError::Storage(memberbase_core::RepoError::InvalidData(format!(
            "response encoding failed: {err}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_body, status_code, ApiResponse};
    use memberbase_core::{CoreError, EntityKind, ErrorKind, NewUser};
    use serde_json::json;

    #[test]
    fn error_kinds_map_to_http_statuses() {
        assert_eq!(status_code(ErrorKind::NotFound), 404);
        assert_eq!(status_code(ErrorKind::InvalidArgument), 400);
        assert_eq!(status_code(ErrorKind::PreconditionFailed), 412);
        assert_eq!(status_code(ErrorKind::Internal), 500);
    }

    #[test]
    fn error_envelope_carries_label_and_message() {
        let response = ApiResponse::from_error(&CoreError::not_found(EntityKind::Post, "p-1"));
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(response.body["error"], "not_found");
        assert_eq!(response.body["message"], "post not found: p-1");
    }

    #[test]
    fn decode_body_rejects_unknown_and_missing_fields() {
        let unknown = decode_body::<NewUser>(json!({
            "firstName": "a",
            "lastName": "b",
            "email": "c",
            "admin": true
        }))
        .unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::InvalidArgument);

        let missing = decode_body::<NewUser>(json!({ "firstName": "a" })).unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::InvalidArgument);
    }
}
