//! HTTP surface: the router and the server loop.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::app::{AppContext, Result};

pub use error::WebError;

/// Build the router serving `/atom.xml` and `/`.
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/atom.xml", get(handlers::atom_feed))
        .route("/", get(handlers::index))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(ctx: Arc<AppContext>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(ctx)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use crate::app::CaptionFeedError;
    use crate::config::Config;
    use crate::fetcher::Fetcher;
    use crate::store::MemoryStore;

    const UPSTREAM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en">
<title>xkcd.com</title><link href="http://xkcd.com/" rel="alternate"></link>
<id>http://xkcd.com/</id><updated>2024-03-01T00:00:00Z</updated>
<entry><title>Tables &amp; Bobby</title><link href="http://xkcd.com/327/" rel="alternate"></link>
<updated>2024-03-01T00:00:00Z</updated><id>http://xkcd.com/327/</id>
<summary type="html">&lt;img src="http://imgs.xkcd.com/comics/exploits_of_a_mom.png" alt="Her daughter is named Help" /&gt;</summary></entry>
</feed>"#;

    struct StaticFetcher {
        body: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> crate::app::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.body {
                Some(body) => Ok(body.as_bytes().to_vec()),
                None => Err(CaptionFeedError::UpstreamStatus(reqwest::StatusCode::BAD_GATEWAY)),
            }
        }
    }

    fn app(body: Option<&'static str>) -> (Router, Arc<StaticFetcher>) {
        let fetcher = Arc::new(StaticFetcher {
            body,
            calls: AtomicUsize::new(0),
        });
        let ctx = AppContext::with_parts(
            Config::default(),
            fetcher.clone(),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();
        (create_router(Arc::new(ctx)), fetcher)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_atom_feed_route() {
        let (router, _) = app(Some(UPSTREAM));
        let (status, content_type, body) = get(router, "/atom.xml").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/atom+xml"));
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(body.contains("https://imgs.xkcd.com/comics/exploits_of_a_mom.png"));
        assert!(!body.contains("http://xkcd.com"));
        assert!(!body.contains("http://imgs.xkcd.com"));
        assert!(body.contains("/&gt;\nHer daughter is named Help</summary>"));
    }

    #[tokio::test]
    async fn test_index_route() {
        let (router, _) = app(Some(UPSTREAM));
        let (status, content_type, body) = get(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("<h2>Tables &amp; Bobby</h2>"));
        assert!(body.contains(
            r#"<img src="https://imgs.xkcd.com/comics/exploits_of_a_mom.png" alt="Her daughter is named Help" />"#
        ));
        assert!(body.contains(r#"<p class="caption">Her daughter is named Help</p>"#));
    }

    #[tokio::test]
    async fn test_routes_share_the_cache() {
        let (router, fetcher) = app(Some(UPSTREAM));

        get(router.clone(), "/").await;
        get(router, "/atom.xml").await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let (router, _) = app(None);
        let (status, _, body) = get(router, "/atom.xml").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.starts_with("failed to get upstream atom: "));
        assert!(body.contains("502"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (router, _) = app(Some(UPSTREAM));
        let (status, _, _) = get(router, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
