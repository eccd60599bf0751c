//! ProofVid REST API Handlers
//!
//! Thin JSON adapters over [`proofvid::Registry`]. Status codes are the
//! primary error signal; bodies carry an `error` or `message` text.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use proofvid::store::Store;
use proofvid::{Certificate, Registration, Registry, RegistryError};
use serde::Serialize;
use serde_json::{Map, Value};

pub const MSG_REGISTERED: &str = "Video hash registered successfully";
pub const MSG_HASH_REQUIRED: &str = "Video hash is required";
pub const MSG_ALREADY_REGISTERED: &str = "This video hash has already been registered";
pub const MSG_NO_CERTIFICATE: &str = "No certificate found for this video hash";
pub const MSG_CERTIFICATE_NOT_FOUND: &str = "Certificate not found";
pub const MSG_BODY_TOO_LARGE: &str = "Request body is too large";

// ==================== API Types ====================

/// Body of `POST /api/register`.
///
/// Only a JSON object is accepted; arrays are never read positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub hash: String,
    pub device_info: String,
    pub location: String,
    pub metadata: String,
}

impl RegisterRequest {
    /// Read a register body: a JSON object with a string `hash`. The other
    /// fields are optional strings; missing or `null` reads as empty.
    pub fn from_json(body: Value) -> Result<Self, ApiError> {
        let Value::Object(mut fields) = body else {
            return Err(ApiError::bad_request(MSG_HASH_REQUIRED));
        };

        let hash = match fields.remove("hash") {
            Some(Value::String(hash)) => hash,
            _ => return Err(ApiError::bad_request(MSG_HASH_REQUIRED)),
        };

        Ok(Self {
            hash,
            device_info: optional_text(&mut fields, "device_info")?,
            location: optional_text(&mut fields, "location")?,
            metadata: optional_text(&mut fields, "metadata")?,
        })
    }
}

fn optional_text(fields: &mut Map<String, Value>, key: &str) -> Result<String, ApiError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(ApiError::bad_request(format!("{} must be a string", key))),
    }
}

/// Response from a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub certificate_id: String,
    pub hash: String,
    pub timestamp: String,
    pub message: String,
}

/// Response from `GET /api/verify/{hash}`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
    #[serde(flatten)]
    pub certificate: Option<Certificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response from `GET /api/certificate/{certificate_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateResponse {
    pub found: bool,
    #[serde(flatten)]
    pub certificate: Option<Certificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response from `GET /api/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_certificates: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Echo of the conflicting digest on 409.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Shared application state
pub struct AppState {
    pub registry: Registry<Arc<dyn Store>>,
}

// ==================== Error Handling ====================

#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub Json<ErrorResponse>);

impl ApiError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        ApiError(
            status,
            Json(ErrorResponse {
                error: msg.into(),
                hash: None,
            }),
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn conflict(msg: impl Into<String>, hash: impl Into<String>) -> Self {
        ApiError(
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: msg.into(),
                hash: Some(hash.into()),
            }),
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map a body that could not be read as JSON. Oversized bodies keep
    /// their 413; anything else is a bad request.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(StatusCode::PAYLOAD_TOO_LARGE, MSG_BODY_TOO_LARGE);
        }
        tracing::debug!(error = %rejection.body_text(), "rejected register body");
        Self::bad_request(MSG_HASH_REQUIRED)
    }
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::Input(_) => ApiError::bad_request(MSG_HASH_REQUIRED),
            RegistryError::Conflict { digest } => {
                ApiError::conflict(MSG_ALREADY_REGISTERED, digest.into_inner())
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

// ==================== Health Check ====================

pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ==================== Registry Handlers ====================

/// Register a video hash and issue a certificate
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(body) = body.map_err(ApiError::from_rejection)?;
    let request = RegisterRequest::from_json(body)?;

    let registration = Registration::new(request.hash)
        .device_info(request.device_info)
        .location(request.location)
        .metadata(request.metadata);

    let cert = state.registry.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            certificate_id: cert.certificate_id.into_inner(),
            hash: cert.digest.into_inner(),
            timestamp: cert.issued_at,
            message: MSG_REGISTERED.to_string(),
        }),
    ))
}

/// Verify whether a video hash has a certificate
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> Result<Response, ApiError> {
    let response = match state.registry.verify(&hash).await? {
        Some(cert) => (
            StatusCode::OK,
            Json(VerifyResponse {
                verified: true,
                certificate: Some(cert),
                message: None,
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(VerifyResponse {
                verified: false,
                certificate: None,
                message: Some(MSG_NO_CERTIFICATE.to_string()),
            }),
        ),
    };

    Ok(response.into_response())
}

/// Get certificate details by certificate ID
pub async fn get_certificate(
    State(state): State<Arc<AppState>>,
    Path(certificate_id): Path<String>,
) -> Result<Response, ApiError> {
    let response = match state.registry.certificate(&certificate_id).await? {
        Some(cert) => (
            StatusCode::OK,
            Json(CertificateResponse {
                found: true,
                certificate: Some(cert),
                message: None,
            }),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(CertificateResponse {
                found: false,
                certificate: None,
                message: Some(MSG_CERTIFICATE_NOT_FOUND.to_string()),
            }),
        ),
    };

    Ok(response.into_response())
}

/// Get statistics about registered videos
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let total_certificates = state.registry.count().await?;
    Ok(Json(StatsResponse { total_certificates }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_reads_object() {
        let request = RegisterRequest::from_json(json!({
            "hash": "abc123",
            "device_info": "Pixel 8",
            "location": null,
        }))
        .unwrap();

        assert_eq!(
            request,
            RegisterRequest {
                hash: "abc123".to_string(),
                device_info: "Pixel 8".to_string(),
                ..RegisterRequest::default()
            }
        );
    }

    #[test]
    fn test_register_request_rejects_positional_bodies() {
        for body in [json!(["abc123"]), json!(["h", "dev", "loc", "meta"]), json!("abc123")] {
            let ApiError(status, Json(error)) = RegisterRequest::from_json(body).unwrap_err();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(error.error, MSG_HASH_REQUIRED);
        }
    }

    #[test]
    fn test_register_request_rejects_non_string_fields() {
        let ApiError(status, _) =
            RegisterRequest::from_json(json!({"hash": "abc123", "metadata": {"fps": 30}}))
                .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
