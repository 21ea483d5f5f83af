use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::context::{RequestContext, redirect};
use super::flash::Flash;
use super::{ApiError, AppState, pages};
use crate::domain::{CurrentUser, Destination, SessionUser};
use crate::models::user::Registration;
use crate::services::AuthError;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /register/
pub async fn register_form(ctx: RequestContext) -> Result<Response, ApiError> {
    if ctx.user.is_authenticated() {
        return Ok(redirect(&ctx.user.home()));
    }

    let flashes = ctx.take_flashes().await?;
    Ok(pages::register(&flashes, &Registration::default(), &[]).into_response())
}

/// POST /register/
pub async fn register(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Form(form): Form<Registration>,
) -> Result<Response, ApiError> {
    if ctx.user.is_authenticated() {
        return Ok(redirect(&ctx.user.home()));
    }

    match state.auth_service().register(&form).await {
        Ok(user) => {
            info!(user_id = %user.id, "Registered new account");
            ctx.flash(Flash::success("Account created. You can now log in."))
                .await?;
            Ok(redirect(&Destination::Login))
        }
        Err(AuthError::InvalidRegistration(errors)) => {
            let flashes = ctx.take_flashes().await?;
            Ok(pages::register(&flashes, &form, &errors).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /login/
pub async fn login_form(ctx: RequestContext) -> Result<Response, ApiError> {
    if ctx.user.is_authenticated() {
        return Ok(redirect(&ctx.user.home()));
    }

    let flashes = ctx.take_flashes().await?;
    Ok(pages::login(&flashes, "", None).into_response())
}

/// POST /login/
pub async fn login(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    if ctx.user.is_authenticated() {
        return Ok(redirect(&ctx.user.home()));
    }

    match state
        .auth_service()
        .login(form.username.trim(), &form.password)
        .await
    {
        Ok(user) => {
            ctx.login(&user).await?;
            info!(user_id = %user.id, "User logged in");
            let current = CurrentUser::Authenticated(SessionUser::from(user));
            Ok(redirect(&current.home()))
        }
        Err(AuthError::InvalidCredentials) => {
            let flashes = ctx.take_flashes().await?;
            Ok(pages::login(
                &flashes,
                form.username.trim(),
                Some("Invalid username or password"),
            )
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET|POST /logout/
pub async fn logout(ctx: RequestContext) -> Result<Response, ApiError> {
    if let Some(name) = ctx.user.username() {
        info!(username = %name, "User logged out");
    }
    ctx.logout().await?;
    Ok(redirect(&Destination::Login))
}
