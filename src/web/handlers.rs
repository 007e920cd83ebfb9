//! Request handlers for the two published outputs.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};

use crate::app::AppContext;
use crate::atom;
use crate::render::{page_entries, render_page, republish};
use crate::web::error::WebError;

/// GET /atom.xml - The upstream feed with captions appended.
pub async fn atom_feed(State(ctx): State<Arc<AppContext>>) -> Result<Response, WebError> {
    let feed = ctx.feeds.get_feed().await.map_err(WebError::Upstream)?;
    let body = republish(&feed).map_err(WebError::Render)?;

    Ok(([(header::CONTENT_TYPE, atom::CONTENT_TYPE)], body).into_response())
}

/// GET / - HTML page listing the latest comics with their captions.
pub async fn index(State(ctx): State<Arc<AppContext>>) -> Result<Html<String>, WebError> {
    let feed = ctx.feeds.get_feed().await.map_err(WebError::Upstream)?;
    Ok(Html(render_page(&page_entries(&feed))))
}
