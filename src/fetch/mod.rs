//! Leaderboard retrieval.
//!
//! Pages through a remote leaderboard until every entry the server reports
//! has been received. Pages are requested one at a time because each
//! request starts right after the previous page's last entry. Dropping the
//! returned future stops the loop and discards whatever was received.

pub mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{LeaderboardEntry, LeaderboardSnapshot};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No valid session: sign in before requesting ranked data")]
    NoSession,

    #[error("Leaderboard {leaderboard} stalled after {received} of {total} entries")]
    StalledPagination {
        leaderboard: String,
        received: usize,
        total: usize,
    },
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// API root, e.g. `https://example.com/api`
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Entries requested per leaderboard page
    pub page_size: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("ranked-stats/{}", env!("CARGO_PKG_VERSION")),
            page_size: 100,
        }
    }
}

/// Authentication state the fetcher needs, nothing more.
pub trait SessionProvider: Send + Sync {
    fn is_session_valid(&self) -> bool;

    fn entity_token(&self) -> Option<String>;
}

/// Session backed by a fixed entity token.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl SessionProvider for StaticSession {
    fn is_session_valid(&self) -> bool {
        self.token.is_some()
    }

    fn entity_token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// One window of a leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardPage {
    /// Total entries on the leaderboard
    pub entry_count: usize,

    /// 1-based position of the first entry in this page
    pub entry_start: u32,

    /// 1-based position of the last entry in this page
    pub entry_end: u32,

    pub entries: Vec<LeaderboardEntry>,
}

/// Source of leaderboard pages.
#[async_trait]
pub trait LeaderboardPageSource: Send + Sync {
    /// Fetch up to `page_size` entries starting at the 1-based `start`.
    async fn fetch_page(
        &self,
        leaderboard_id: &str,
        start: u32,
        page_size: u32,
    ) -> Result<LeaderboardPage, FetchError>;
}

/// Fetch every entry of a leaderboard, in server order.
///
/// Any failed page fails the whole fetch.
pub async fn fetch_full_leaderboard<S>(
    source: &S,
    leaderboard_id: &str,
    page_size: u32,
) -> Result<Vec<LeaderboardEntry>, FetchError>
where
    S: LeaderboardPageSource + ?Sized,
{
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut start = 1;

    loop {
        let page = source.fetch_page(leaderboard_id, start, page_size).await?;
        debug!(
            "Leaderboard {}: got entries {}..={} of {}",
            leaderboard_id, page.entry_start, page.entry_end, page.entry_count
        );

        let total = page.entry_count;
        if page.entries.is_empty() && entries.len() < total {
            return Err(FetchError::StalledPagination {
                leaderboard: leaderboard_id.to_string(),
                received: entries.len(),
                total,
            });
        }

        start = page.entry_end + 1;
        entries.extend(page.entries);

        if entries.len() >= total {
            break;
        }
    }

    info!(
        "Leaderboard {}: fetched {} entries",
        leaderboard_id,
        entries.len()
    );
    Ok(entries)
}

/// Fetch a full leaderboard and stamp it with the fetch time.
pub async fn fetch_snapshot<S>(
    source: &S,
    leaderboard_id: &str,
    page_size: u32,
) -> Result<LeaderboardSnapshot, FetchError>
where
    S: LeaderboardPageSource + ?Sized,
{
    let entries = fetch_full_leaderboard(source, leaderboard_id, page_size).await?;
    Ok(LeaderboardSnapshot::new(leaderboard_id, entries))
}
