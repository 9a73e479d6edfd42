use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde::Serialize;
use service::errors::ServiceError;
use tracing::error;

/// JSON error body: `{"error": <title>, "message": <detail>}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self { status, error: error.to_string(), message: message.into() }
    }

    fn internal(message: String) -> Self {
        error!(error = %message, "store failure");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ServiceError::Model(ModelError::Validation(msg)) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", msg),
            ServiceError::Conflict(key) => Self::new(StatusCode::BAD_REQUEST, "Conflict", key.message()),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", msg),
            ServiceError::Db(msg) | ServiceError::Model(ModelError::Db(msg)) => Self::internal(msg),
        }
    }
}

/// Prefix axum puts in front of the serde message for a body that does not fit the payload type.
const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Malformed or incomplete request bodies are bad input, reported with the serde detail
/// (e.g. "missing field `inn` at line 1 column 120").
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let message = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(&text).to_string();
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", message)
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", rejection.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::user_record::uniqueness::UniqueKey;

    #[test]
    fn service_errors_map_to_status_and_message() {
        let e = JsonApiError::from(ServiceError::Conflict(UniqueKey::Bik));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.message, "BIK already exists");

        let e = JsonApiError::from(ServiceError::NotFound("User not found".into()));
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.error, "Not Found");

        let e = JsonApiError::from(ServiceError::Db("connection reset".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_omits_status() {
        let e = JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", "bik is required");
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Validation Error", "message": "bik is required"}));
    }
}
