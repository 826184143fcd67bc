//! Authentication route handlers.
//!
//! Username/password login against the seeded administrator account.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, authenticate};
use crate::state::AppState;

use super::redirect_target;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
}

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    error: String,
    form_username: String,
    next: String,
}

/// `?next=` parameter carried through the login flow.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Render the login page; already-authenticated visitors go to the catalog.
///
/// GET /login
async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<NextQuery>,
) -> Result<Response, AppError> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let template = LoginPageTemplate {
        error: String::new(),
        form_username: String::new(),
        next: query.next.unwrap_or_default(),
    };

    Ok(Html(template.render()?).into_response())
}

/// Verify credentials and establish the session.
///
/// POST /login
#[instrument(skip(state, session, form), fields(username = %form.username))]
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    axum::Form(form): axum::Form<LoginForm>,
) -> Result<Response, AppError> {
    match authenticate(state.pool(), &form.username, &form.password).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;

            let target = redirect_target(form.next.as_deref(), "/");
            Ok(Redirect::to(&target).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            // Re-render the form; which half was wrong stays undisclosed.
            let template = LoginPageTemplate {
                error: "Invalid credentials.".to_string(),
                form_username: form.username,
                next: form.next.unwrap_or_default(),
            };
            Ok(Html(template.render()?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Logout and clear the session identity.
///
/// POST /logout
async fn logout(_user: RequireAuth, session: Session) -> Result<Response, AppError> {
    clear_current_user(&session).await?;

    Ok(Redirect::to("/login").into_response())
}
