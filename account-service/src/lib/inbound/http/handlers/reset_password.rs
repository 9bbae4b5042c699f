use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::domain::user::models::Password;
use crate::domain::user::models::UserId;
use crate::inbound::http::extractors::JsonBody;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    password: String,
}

/// Replace a user's password. The user's live token stops working.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let password = Password::new(req.password).map_err(UserError::from)?;

    state
        .user_service
        .reset_password(&user_id, password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("password updated")))
}
