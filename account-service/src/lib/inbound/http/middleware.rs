use auth::Authenticator;
use auth::Claims;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Verified identity attached to request extensions by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub claims: Claims,
}

/// Why the gate turned a request away. Logged, never sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("missing token")]
    MissingToken,

    #[error("unauthorized: {0}")]
    Unauthorized(#[from] JwtError),
}

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::MissingToken => ApiError::Forbidden("Token is required.".to_string()),
            GateRejection::Unauthorized(_) => ApiError::Forbidden("Invalid token.".to_string()),
        }
    }
}

/// Decide whether a request may proceed.
///
/// The `Authorization` header carries the bare token, without a scheme
/// prefix. An absent or blank header is `MissingToken`; anything else is
/// handed to the verifier as-is.
pub fn authorize(
    authenticator: &Authenticator,
    headers: &HeaderMap,
) -> Result<AuthContext, GateRejection> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(GateRejection::MissingToken)?;

    let token = header
        .to_str()
        .map_err(|_| JwtError::Malformed("header is not visible ASCII".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(GateRejection::MissingToken);
    }

    let claims = authenticator.validate_token(token)?;
    Ok(AuthContext { claims })
}

/// Middleware that gates protected routes and stores the AuthContext in request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(&state.authenticator, req.headers()) {
        Ok(context) => {
            tracing::debug!(user_id = %context.claims.sub, "Request authorized");
            req.extensions_mut().insert(context);
            Ok(next.run(req).await)
        }
        Err(rejection) => {
            tracing::warn!(
                reason = %rejection,
                method = %req.method(),
                uri = %req.uri(),
                "Request rejected by auth gate"
            );
            Err(rejection.into())
        }
    }
}
