//! Account auth route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/register`.
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };

    let service = AuthService::new(state.pool(), state.config());
    let session = service.register(&name, &email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": session.token, "user": session.user })),
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/auth/login`.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };

    let service = AuthService::new(state.pool(), state.config());
    let session = service.login(&email, &password).await?;

    Ok(Json(
        json!({ "token": session.token, "user": session.user }),
    ))
}

/// Password rotation request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordBody {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// `POST /api/auth/change-password`.
///
/// Failure messages follow the legacy contract: a bad current password is
/// reported distinctly from a missing account, both as 400.
#[instrument(skip(state, body))]
pub async fn change_password(
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<serde_json::Value>> {
    let (Some(email), Some(current), Some(new)) =
        (body.email, body.current_password, body.new_password)
    else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };

    let service = AuthService::new(state.pool(), state.config());
    service
        .change_password(&email, &current, &new)
        .await
        .map_err(|e| match e {
            AuthError::WrongPassword => {
                AppError::BadRequest("Current password is incorrect".to_owned())
            }
            AuthError::UnknownEmail | AuthError::InvalidEmail(_) => {
                AppError::BadRequest("User not found".to_owned())
            }
            other => AppError::Auth(other),
        })?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}
