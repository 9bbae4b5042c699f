use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::UserData;
use crate::domain::auth::models::AuthenticatedUser;

pub async fn current_user(
    Extension(authenticated): Extension<AuthenticatedUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&authenticated.user).into())
}
