//! Radio 24h Feed Client
//!
//! HTTP client for the release feed that lists the station's tracks. Each
//! release asset becomes a raw playlist entry (`browser_download_url`,
//! `name`); normalization happens in `radio-core`.
//!
//! Works natively (with an optional request timeout) and in the browser,
//! where reqwest goes through `fetch`.
//!
//! # Example
//!
//! ```ignore
//! use radio_feed_client::ReleaseFeedClient;
//! use radio_core::{FeedSettings, TrackFeed};
//!
//! let client = ReleaseFeedClient::new(&FeedSettings::default())?;
//! let entries = TrackFeed::fetch_entries(&client).await?;
//! println!("{} entries", entries.len());
//! ```

mod client;
mod error;
mod types;

// Re-export main types
pub use client::ReleaseFeedClient;
pub use error::{FeedClientError, Result};
pub use types::Release;
