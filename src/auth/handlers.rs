use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        password::{hash_password, verify_decoy, verify_password},
        repo_types::{RepoError, User},
    },
    error::AppError,
    pages,
    session::{Session, UserRef},
    state::AppState,
};

pub const DUPLICATE_EMAIL: &str = "Email already exists. Try a different one.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

pub async fn register_form() -> Html<String> {
    Html(pages::register_page())
}

pub async fn login_form() -> Html<String> {
    Html(pages::login_page())
}

#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let hash = hash_password(&form.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        e
    })?;

    match User::create(&state.db, &form.email, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, "user registered");
            Ok(Redirect::to("/login").into_response())
        }
        Err(RepoError::DuplicateEmail) => {
            warn!("email already registered");
            Ok((StatusCode::CONFLICT, DUPLICATE_EMAIL).into_response())
        }
        Err(RepoError::Other(e)) => Err(e.into()),
    }
}

#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let Some(user) = User::find_by_email(&state.db, &form.email).await? else {
        verify_decoy(&form.password);
        warn!("login unknown email");
        return Ok(invalid_credentials());
    };

    if !verify_password(&form.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Ok(invalid_credentials());
    }

    session.sign_in(UserRef {
        id: user.id,
        email: user.email,
    });
    session.cycle_id().await?;
    session.save().await?;

    info!(user_id = user.id, "user logged in");
    Ok(Redirect::to("/").into_response())
}

/// Clears the identity; harmless without an active session.
#[instrument(skip_all)]
pub async fn logout(mut session: Session) -> Result<Redirect, AppError> {
    if let Some(user) = session.identity.as_ref() {
        info!(user_id = user.id, "user logged out");
    }
    session.sign_out();
    session.save().await?;
    Ok(Redirect::to("/login"))
}

fn invalid_credentials() -> Response {
    (StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS).into_response()
}
