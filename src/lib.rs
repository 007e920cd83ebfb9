//! # captionfeed
//!
//! Republishes the xkcd Atom feed with each comic's mouseover text printed
//! under the image, and renders the same entries as an HTML page.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → LinkRewriter → Atom parser → Cache → Republish / Page
//! ```
//!
//! - [`fetcher`]: HTTP retrieval and the caching orchestrator
//! - [`normalizer`]: `http://` to `https://` rewriting ahead of parsing
//! - [`atom`]: Atom reader and writer
//! - [`store`]: Cache backends (memory, SQLite)
//! - [`render`]: Captioned feed and HTML page
//! - [`web`]: axum router
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve /atom.xml and / on the configured address
//! captionfeed serve
//!
//! # Print the captioned feed once
//! captionfeed feed
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// cache store and normalizer from a [`Config`](config::Config).
pub mod app;

/// Atom 1.0 parsing and serialization.
pub mod atom;

/// Command-line interface using clap.
///
/// - `serve [--bind ADDR]` - Run the HTTP server
/// - `feed` - Print the captioned Atom feed
/// - `page` - Print the HTML page
pub mod cli;

/// Configuration loaded from `~/.config/captionfeed/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`FeedDocument`](domain::FeedDocument): The parsed feed
/// - [`Entry`](domain::Entry): One comic, with a raw-markup [`Summary`](domain::Summary)
/// - [`extract_caption`](domain::extract_caption): Alt text lookup
pub mod domain;

/// Upstream fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for document retrieval
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`CachingFetcher`](fetcher::CachingFetcher): Fetch-or-reuse against a [`CacheStore`](store::CacheStore)
pub mod fetcher;

/// Link rewriting and parsing of upstream bytes.
pub mod normalizer;

/// Output adapters over a [`FeedDocument`](domain::FeedDocument).
pub mod render;

/// Cache storage.
///
/// - [`CacheStore`](store::CacheStore): Trait defining get/set with expiry
/// - [`MemoryStore`](store::MemoryStore): In-process map
/// - [`SqliteStore`](store::SqliteStore): SQLite file shared between processes
pub mod store;

/// HTTP routes for the feed and the page.
pub mod web;
