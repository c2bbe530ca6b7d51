//! Admin route handlers.

use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;

use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::Product;
use crate::models::user::AdminUserView;
use crate::routes::auth::LoginBody;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// `POST /api/admin/login`.
///
/// The configured built-in admin short-circuits; any other email is a
/// regular account login whose token carries the stored `isAdmin` flag.
/// Failure messages differ from the user login endpoint by contract.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<serde_json::Value>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    };

    let service = AuthService::new(state.pool(), state.config());
    let session = service
        .admin_login(&email, &password)
        .await
        .map_err(|e| match e {
            AuthError::UnknownEmail | AuthError::InvalidEmail(_) => {
                AppError::BadRequest("User not found".to_owned())
            }
            AuthError::WrongPassword => AppError::BadRequest("Invalid credentials".to_owned()),
            other => AppError::Auth(other),
        })?;

    Ok(Json(json!({
        "token": session.token,
        "isAdmin": session.is_admin,
        "user": session.user,
    })))
}

/// `GET /api/admin/users` — every account, password hashes excluded.
#[instrument(skip(state, _admin))]
pub async fn users(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AdminUserView>>> {
    let repo = UserRepository::new(state.pool());
    let users = repo.list_all().await?;

    Ok(Json(users.into_iter().map(AdminUserView::from).collect()))
}

/// `GET /api/admin/products` — the whole catalog, unpaginated.
#[instrument(skip(state, _admin))]
pub async fn products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.list_all().await?;

    Ok(Json(products))
}
