use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::Local;
use serde::Deserialize;
use std::sync::Arc;

use super::context::{FeedbackPath, RequestContext, redirect};
use super::flash::Flash;
use super::{ApiError, AppState, pages};
use crate::domain::{DashboardQuery, Destination, policy};
use crate::services::FeedbackError;

#[derive(Debug, Default, Deserialize)]
pub struct ReplyForm {
    #[serde(default)]
    pub message: String,
}

/// Non-staff never reach dashboard content; anonymous visitors go to login.
fn staff_only(ctx: &RequestContext) -> Option<Response> {
    if let Some(login) = ctx.require_login() {
        return Some(login);
    }
    (!policy::can_view_admin_dashboard(&ctx.user)).then(|| redirect(&Destination::Homepage))
}

/// GET /dashboard
pub async fn index(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, ApiError> {
    if let Some(away) = staff_only(&ctx) {
        return Ok(away);
    }

    let now = Local::now();
    let threads = state
        .feedback_service()
        .dashboard(&ctx.user, &query, now)
        .await?;

    let flashes = ctx.take_flashes().await?;
    Ok(pages::dashboard(&ctx.user, &flashes, &query, &threads).into_response())
}

/// GET /dashboard/feedback/{id}/reply/
pub async fn reply_form(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
) -> Result<Response, ApiError> {
    if let Some(away) = staff_only(&ctx) {
        return Ok(away);
    }

    let thread = state
        .feedback_service()
        .reply_thread(&ctx.user, id)
        .await?;

    let flashes = ctx.take_flashes().await?;
    Ok(pages::reply(&ctx.user, &flashes, &thread).into_response())
}

/// POST /dashboard/feedback/{id}/reply/
pub async fn reply(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    FeedbackPath(id): FeedbackPath,
    Form(form): Form<ReplyForm>,
) -> Result<Response, ApiError> {
    if let Some(away) = staff_only(&ctx) {
        return Ok(away);
    }

    match state
        .feedback_service()
        .reply(&ctx.user, id, &form.message)
        .await
    {
        Ok(Some(_)) => {
            ctx.flash(Flash::success("Reply posted.")).await?;
        }
        Ok(None) => {
            ctx.flash(Flash::error("Reply cannot be empty.")).await?;
        }
        Err(FeedbackError::Forbidden) => return Ok(redirect(&Destination::Homepage)),
        Err(e) => return Err(e.into()),
    }

    Ok(redirect(&Destination::AdminDashboard))
}
