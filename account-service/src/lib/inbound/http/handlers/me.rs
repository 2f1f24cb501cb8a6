use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthContext;

/// Echo the identity established by the auth gate. Does not touch the store.
pub async fn me(
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    let claims = &context.claims;

    let to_datetime = |ts: i64| {
        Utc.timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| ApiError::InternalServerError(format!("timestamp out of range: {}", ts)))
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Authenticated.",
        MeResponseData {
            user: IdentityData {
                id: claims.sub.clone(),
                email: claims.email.clone(),
                issued_at: to_datetime(claims.iat)?,
                expires_at: to_datetime(claims.exp)?,
            },
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user: IdentityData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityData {
    pub id: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
