use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::auth::models::AuthenticatedUser;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Revoke the token the request was authenticated with.
pub async fn logout(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    state.auth_service.logout(&authenticated.token).await?;

    Ok(ApiSuccess::new(StatusCode::OK, MessageData::new("signed out")))
}
