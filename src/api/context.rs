//! Per-request identity and session access.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::{self, Flash};
use super::{ApiError, AppState};
use crate::domain::{CurrentUser, Destination, FeedbackId, SessionUser, UserId};
use crate::models::user::User;

const USER_ID_KEY: &str = "user_id";

/// Handed to every page handler in place of ambient request globals.
pub struct RequestContext {
    pub user: CurrentUser,
    pub session: Session,
}

impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::internal(msg))?;

        let user = match session.get::<i32>(USER_ID_KEY).await? {
            Some(id) => state
                .auth_service()
                .find_user(UserId::new(id))
                .await?
                .map_or(CurrentUser::Anonymous, |user| {
                    CurrentUser::Authenticated(SessionUser::from(user))
                }),
            None => CurrentUser::Anonymous,
        };

        if let Some(id) = user.id() {
            tracing::Span::current().record("user_id", id.value());
        }

        Ok(Self { user, session })
    }
}

impl RequestContext {
    /// Redirect for anonymous visitors of member pages.
    #[must_use]
    pub fn require_login(&self) -> Option<Response> {
        (!self.user.is_authenticated()).then(|| redirect(&Destination::Login))
    }

    /// Starts an authenticated session under a fresh id.
    pub async fn login(&self, user: &User) -> Result<(), ApiError> {
        self.session.cycle_id().await?;
        self.session.insert(USER_ID_KEY, user.id.value()).await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.flush().await?;
        Ok(())
    }

    pub async fn flash(&self, message: Flash) -> Result<(), ApiError> {
        flash::push(&self.session, message).await?;
        Ok(())
    }

    pub async fn take_flashes(&self) -> Result<Vec<Flash>, ApiError> {
        Ok(flash::drain(&self.session).await?)
    }
}

/// Feedback id taken from the `{id}` path segment.
///
/// Segments that are not a valid id answer 404 like any unknown URL.
pub struct FeedbackPath(pub FeedbackId);

impl<S> FromRequestParts<S> for FeedbackPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::NotFound(rejection.body_text()))?;

        Ok(Self(FeedbackId::new(id)))
    }
}

pub fn redirect(destination: &Destination) -> Response {
    Redirect::to(destination.path()).into_response()
}
