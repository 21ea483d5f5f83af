use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::context::{FeedbackPath, RequestContext, redirect};
use super::flash::Flash;
use super::{ApiError, AppState, pages};
use crate::domain::Destination;
use crate::models::feedback::FeedbackInput;
use crate::services::FeedbackError;

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    #[serde(default)]
    pub next: Option<String>,
}

/// GET /feedback_form
pub async fn form(ctx: RequestContext) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    let flashes = ctx.take_flashes().await?;
    Ok(pages::feedback_form(&ctx.user, &flashes, &FeedbackInput::default()).into_response())
}

/// GET /feedback/submit
pub async fn submit_redirect() -> Response {
    redirect(&Destination::FeedbackForm)
}

/// POST /feedback/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Form(input): Form<FeedbackInput>,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    match state.feedback_service().submit(&ctx.user, &input).await {
        Ok(feedback) => {
            info!(feedback_id = %feedback.id, "Feedback submitted");
            ctx.flash(Flash::success("Feedback submitted successfully."))
                .await?;
            Ok(redirect(&Destination::FeedbackForm))
        }
        Err(FeedbackError::Validation(msg)) => {
            ctx.flash(Flash::error(msg)).await?;
            Ok(redirect(&Destination::FeedbackForm))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /my/feedback/
pub async fn my_feedback(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }
    if ctx.user.is_staff() {
        return Ok(redirect(&Destination::AdminDashboard));
    }

    let threads = state.feedback_service().list_own(&ctx.user).await?;
    let flashes = ctx.take_flashes().await?;
    Ok(pages::my_feedback(&ctx.user, &flashes, &threads).into_response())
}

async fn edit_denied(ctx: &RequestContext) -> Result<Response, ApiError> {
    ctx.flash(Flash::error("You are not allowed to edit this feedback."))
        .await?;
    Ok(redirect(&Destination::default_after_delete(&ctx.user)))
}

/// GET /update/feedback/{id}/
pub async fn edit(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    match state.feedback_service().editable(&ctx.user, id).await {
        Ok(feedback) => {
            let flashes = ctx.take_flashes().await?;
            let input = FeedbackInput::from(&feedback);
            Ok(pages::edit_feedback(&ctx.user, &flashes, id, &input, None).into_response())
        }
        Err(FeedbackError::Forbidden) => edit_denied(&ctx).await,
        Err(e) => Err(e.into()),
    }
}

/// POST /update/feedback/{id}/
pub async fn update(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
    Form(input): Form<FeedbackInput>,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    match state.feedback_service().update(&ctx.user, id, &input).await {
        Ok(feedback) => {
            info!(feedback_id = %feedback.id, "Feedback updated");
            ctx.flash(Flash::success("Feedback updated successfully."))
                .await?;
            Ok(redirect(&Destination::default_after_delete(&ctx.user)))
        }
        Err(FeedbackError::Validation(msg)) => {
            let flashes = ctx.take_flashes().await?;
            Ok(
                pages::edit_feedback(&ctx.user, &flashes, id, &input.trimmed(), Some(&msg))
                    .into_response(),
            )
        }
        Err(FeedbackError::Forbidden) => edit_denied(&ctx).await,
        Err(e) => Err(e.into()),
    }
}

/// GET /delete/feedback/{id}/
///
/// Only shows the confirmation; nothing is removed until the form is posted.
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
    Query(query): Query<NextParam>,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    let fallback = Destination::default_after_delete(&ctx.user);
    match state
        .feedback_service()
        .deletable(&ctx.user, id)
        .await
    {
        Ok(feedback) => {
            let next = query
                .next
                .as_deref()
                .filter(|token| !token.trim().is_empty())
                .and_then(Destination::resolve);
            let cancel = next.clone().unwrap_or_else(|| fallback.clone());
            let flashes = ctx.take_flashes().await?;
            Ok(
                pages::confirm_delete(&ctx.user, &flashes, &feedback, next.as_ref(), &cancel)
                    .into_response(),
            )
        }
        Err(FeedbackError::Forbidden) => Ok(redirect(&fallback)),
        Err(e) => Err(e.into()),
    }
}

/// POST /delete/feedback/{id}/
///
/// `next` from the posted form wins over `next` in the query string.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
    Query(query): Query<NextParam>,
    form: Result<Form<NextParam>, FormRejection>,
) -> Result<Response, ApiError> {
    if let Some(login) = ctx.require_login() {
        return Ok(login);
    }

    let posted = form.map(|Form(p)| p).unwrap_or_default();
    let fallback = Destination::default_after_delete(&ctx.user);

    match state
        .feedback_service()
        .delete(&ctx.user, id)
        .await
    {
        Ok(()) => {
            ctx.flash(Flash::success("Feedback deleted.")).await?;
            let destination = Destination::resolve_or(
                &[posted.next.as_deref(), query.next.as_deref()],
                fallback,
            );
            Ok(redirect(&destination))
        }
        Err(FeedbackError::Forbidden) => Ok(redirect(&fallback)),
        Err(e) => Err(e.into()),
    }
}
