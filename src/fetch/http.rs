//! HTTP client for the ranked game backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::{
    fetch_snapshot, FetchError, FetcherConfig, LeaderboardPage, LeaderboardPageSource,
    SessionProvider,
};
use crate::aggregate::RankedDataSource;
use crate::models::{
    LeaderboardEntry, LeaderboardSnapshot, PlayerId, PlayerPosition, PlayerProfile,
    PlayerStatistics, StatKey,
};

/// Header carrying the signed-in entity token.
pub const ENTITY_TOKEN_HEADER: &str = "X-EntityToken";

// ── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeaderboardPageResponse {
    entry_count: usize,
    entry_start: u32,
    entry_end: u32,
    #[serde(default)]
    entries: Vec<WireLeaderboardEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireLeaderboardEntry {
    identity: String,
    #[serde(deserialize_with = "deserialize_string_or_number_i64")]
    score: i64,
    rank: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct StatisticsResponse {
    #[serde(default)]
    statistics: Vec<WireStatistic>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStatistic {
    statistic_name: String,
    #[serde(deserialize_with = "deserialize_string_or_number_i64")]
    value: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct AroundPlayerResponse {
    #[serde(default)]
    entries: Vec<WireAroundEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAroundEntry {
    #[serde(deserialize_with = "deserialize_string_or_number_i64")]
    stat_value: i64,
    position: u32,
    profile: WireProfile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProfile {
    entity_id: String,
    display_name: Option<String>,
}

/// Deserialize a value that may be a number or a string containing a number.
fn deserialize_string_or_number_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let val = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &val {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| serde::de::Error::custom(format!("expected a number, got {}", val)))
}

impl From<LeaderboardPageResponse> for LeaderboardPage {
    fn from(response: LeaderboardPageResponse) -> Self {
        Self {
            entry_count: response.entry_count,
            entry_start: response.entry_start,
            entry_end: response.entry_end,
            entries: response
                .entries
                .into_iter()
                .map(|e| LeaderboardEntry::new(e.identity, e.rank, e.score))
                .collect(),
        }
    }
}

impl From<StatisticsResponse> for PlayerStatistics {
    fn from(response: StatisticsResponse) -> Self {
        response
            .statistics
            .into_iter()
            .filter_map(|stat| match stat.statistic_name.parse::<StatKey>() {
                Ok(key) => Some((key, stat.value)),
                Err(_) => {
                    debug!("Ignoring statistic {}", stat.statistic_name);
                    None
                }
            })
            .collect()
    }
}

impl From<WireAroundEntry> for PlayerPosition {
    fn from(entry: WireAroundEntry) -> Self {
        Self {
            stat_value: entry.stat_value,
            position: entry.position,
            profile: PlayerProfile {
                entity_id: entry.profile.entity_id.into(),
                display_name: entry.profile.display_name,
            },
        }
    }
}

// ── Client ──────────────────────────────────────────────────────────────────

/// Backend API client.
pub struct ApiClient {
    client: Client,
    config: FetcherConfig,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    /// Create a new client with the given configuration and session.
    pub fn new(
        config: FetcherConfig,
        session: Arc<dyn SessionProvider>,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("ranked-stats/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Fetch a whole leaderboard in pages of the configured size.
    pub async fn leaderboard_snapshot(
        &self,
        leaderboard_id: &str,
    ) -> Result<LeaderboardSnapshot, FetchError> {
        fetch_snapshot(self, leaderboard_id, self.config.page_size).await
    }

    /// Build an endpoint URL below the API root.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, FetchError> {
        let url_str = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&url_str)
            .map_err(|e| FetchError::InvalidUrl(format!("Bad API URL {}: {}", url_str, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn leaderboard_page_url(
        &self,
        leaderboard_id: &str,
        start: u32,
        page_size: u32,
    ) -> Result<Url, FetchError> {
        self.endpoint(
            &format!("leaderboards/{}/entries", leaderboard_id),
            &[("start", start.to_string()), ("count", page_size.to_string())],
        )
    }

    fn around_player_url(
        &self,
        leaderboard_id: &str,
        player: &PlayerId,
    ) -> Result<Url, FetchError> {
        self.endpoint(
            &format!("leaderboards/{}/around/{}", leaderboard_id, player),
            &[("count", "1".to_string())],
        )
    }

    fn statistics_url(&self, player: &PlayerId) -> Result<Url, FetchError> {
        self.endpoint(&format!("players/{}/statistics", player), &[])
    }

    /// GET a JSON document with the session token attached.
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, FetchError> {
        let token = match self.session.entity_token() {
            Some(token) if self.session.is_session_valid() => token,
            _ => return Err(FetchError::NoSession),
        };

        debug!("GET {}", url);
        let response = self
            .client
            .get(url.as_str())
            .header(ENTITY_TOKEN_HEADER, token)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LeaderboardPageSource for ApiClient {
    async fn fetch_page(
        &self,
        leaderboard_id: &str,
        start: u32,
        page_size: u32,
    ) -> Result<LeaderboardPage, FetchError> {
        let url = self.leaderboard_page_url(leaderboard_id, start, page_size)?;
        let response: LeaderboardPageResponse = self.get_json(&url).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl RankedDataSource for ApiClient {
    async fn player_statistics(&self, player: &PlayerId) -> Result<PlayerStatistics, FetchError> {
        let url = self.statistics_url(player)?;
        let response: StatisticsResponse = self.get_json(&url).await?;
        let stats = PlayerStatistics::from(response);
        info!("Fetched {} ranked statistics for {}", stats.len(), player);
        Ok(stats)
    }

    async fn leaderboard_around_player(
        &self,
        leaderboard_id: &str,
        player: &PlayerId,
    ) -> Result<Vec<PlayerPosition>, FetchError> {
        let url = self.around_player_url(leaderboard_id, player)?;
        let response: AroundPlayerResponse = self.get_json(&url).await?;
        Ok(response.entries.into_iter().map(PlayerPosition::from).collect())
    }

    async fn leaderboard_size(&self, leaderboard_id: &str) -> Result<usize, FetchError> {
        let page = self.fetch_page(leaderboard_id, 1, 1).await?;
        Ok(page.entry_count)
    }
}
