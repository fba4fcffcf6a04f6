//! Kotoba API Routes
//!
//! - /linebot - LINE webhook ingress (public, signature-checked)
//! - /linebot/push - Operator push messages
//! - /weather/:city - Forecast lookup
//! - /notification - Realtime notification hub

use axum::http::StatusCode;

use kotoba::DomainError;

pub mod linebot;
pub mod notification;
pub mod swagger;
pub mod weather;

/// Map a domain error onto the HTTP response handlers return
///
/// Upstream rejections keep the platform's status and body so the caller
/// sees exactly what LINE answered.
pub fn error_response(err: DomainError) -> (StatusCode, String) {
    match err {
        DomainError::Upstream { status, body } => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            body,
        ),
        DomainError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        err @ DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        err @ DomainError::ExternalService(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_preserved() {
        let (status, body) = error_response(DomainError::upstream(401, "bad token"));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "bad token");
    }

    #[test]
    fn test_invalid_upstream_status_becomes_bad_gateway() {
        let (status, _) = error_response(DomainError::upstream(42, "?"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_domain_errors_map_to_client_and_gateway_codes() {
        assert_eq!(
            error_response(DomainError::Validation("x".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(DomainError::not_found("Location", "火星市")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(DomainError::ExternalService("down".into())).0,
            StatusCode::BAD_GATEWAY
        );
    }
}
