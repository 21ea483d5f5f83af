use axum::response::{IntoResponse, Response};

use super::context::{RequestContext, redirect};
use super::{ApiError, pages};
use crate::domain::Destination;

/// GET /
pub async fn index(ctx: RequestContext) -> Result<Response, ApiError> {
    if ctx.user.is_staff() {
        return Ok(redirect(&Destination::AdminDashboard));
    }

    let flashes = ctx.take_flashes().await?;
    Ok(pages::home(&ctx.user, &flashes).into_response())
}

pub async fn not_found() -> Response {
    ApiError::NotFound("no such route".to_string()).into_response()
}
