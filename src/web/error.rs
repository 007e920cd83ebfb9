//! Mapping of pipeline failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::CaptionFeedError;

/// A request-scoped failure. Every variant is answered with a 500.
#[derive(Debug)]
pub enum WebError {
    /// The feed could not be obtained from cache or upstream.
    Upstream(CaptionFeedError),
    /// The feed was obtained but could not be written out.
    Render(CaptionFeedError),
}

impl WebError {
    pub fn message(&self) -> String {
        match self {
            WebError::Upstream(e) => format!("failed to get upstream atom: {}", e),
            WebError::Render(e) => format!("failed to marshal feed: {}", e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let message = self.message();
        tracing::error!("{}", message);
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
