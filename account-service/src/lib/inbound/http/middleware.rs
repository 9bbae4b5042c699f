use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that resolves the bearer token to a user and stores the
/// resulting `AuthenticatedUser` in the request extensions.
///
/// Every refusal answers the same 401; the reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not visible ASCII is handled as a malformed one.
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default().to_string());

    let authenticated = state
        .auth_service
        .authenticate(authorization.as_deref())
        .await?;

    req.extensions_mut().insert(authenticated);

    Ok(next.run(req).await)
}
