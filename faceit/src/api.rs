use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::models::{Game, Match, MatchStats, Player, Statistic};

pub const DATA_API_URL: &str = "https://open.faceit.com/data/v4";
pub const STATS_API_URL: &str = "https://api.faceit.com/stats/v1";

const GAME: &str = "csgo";
const CHAMPIONSHIP_PAGE: usize = 100;
const HISTORY_PAGE: usize = 20;
const STATISTICS_PAGE: usize = 100;
const PAGE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("{url} was not found")]
    NotFound { url: String },
    #[error("Response of {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub struct Client {
    http: reqwest::Client,
    api_key: String,
    data_url: String,
    stats_url: String,
    retries: u32,
    retry_delay: Duration,
}

#[derive(Debug, Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PlayerDetails {
    player_id: String,
    nickname: String,
    #[serde(default)]
    games: std::collections::HashMap<String, GameDetails>,
}

#[derive(Debug, Deserialize)]
struct GameDetails {
    #[serde(default)]
    skill_level: Option<u32>,
}

impl From<PlayerDetails> for Player {
    fn from(mut details: PlayerDetails) -> Self {
        Self {
            skill_level: details.games.remove(GAME).and_then(|g| g.skill_level),
            player_id: details.player_id,
            nickname: details.nickname,
        }
    }
}

fn unwrap_payload(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut object) if object.contains_key("payload") => {
            object.remove("payload").unwrap_or_default()
        }
        other => other,
    }
}

fn retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl Client {
    pub fn new<IS>(api_key: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            data_url: DATA_API_URL.to_owned(),
            stats_url: STATS_API_URL.to_owned(),
            retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.apikey.clone())
            .with_base_urls(config.data_url.clone(), config.stats_url.clone())
            .with_retries(config.retries, config.retry_delay())
    }

    pub fn with_base_urls<IS>(mut self, data_url: IS, stats_url: IS) -> Self
    where
        IS: Into<String>,
    {
        self.data_url = data_url.into().trim_end_matches('/').to_owned();
        self.stats_url = stats_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = delay;
        self
    }

    /// Performs the GET request, `None` if the resource does not exist.
    async fn request<T>(&self, url: &str, args: &[(&str, String)]) -> Result<Option<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let response = loop {
            attempt += 1;

            let result = self
                .http
                .get(url)
                .bearer_auth(&self.api_key)
                .header(reqwest::header::ACCEPT, "application/json")
                .query(args)
                .send()
                .await;

            match result {
                Ok(response) if retryable(response.status()) && attempt <= self.retries => {
                    tracing::warn!(url, status = %response.status(), attempt, "Retrying request");
                }
                Ok(response) => break response,
                Err(e) if attempt <= self.retries => {
                    tracing::warn!(url, error = %e, attempt, "Retrying request");
                }
                Err(e) => return Err(e.into()),
            }

            tokio::time::sleep(self.retry_delay).await;
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                url: url.to_owned(),
            });
        }

        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(unwrap_payload(value))
            .map(Some)
            .map_err(|source| ApiError::Decode {
                url: url.to_owned(),
                source,
            })
    }

    async fn get<T>(&self, url: String, args: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        match self.request(&url, args).await? {
            Some(value) => Ok(value),
            None => Err(ApiError::NotFound { url }),
        }
    }

    /// All matches of the championship, played or not.
    #[tracing::instrument(skip(self))]
    pub async fn championship_matches(&self, championship_id: &str) -> Result<Vec<Match>, ApiError> {
        let url = format!("{}/championships/{}/matches", self.data_url, championship_id);

        let mut matches = Vec::new();
        loop {
            let args = [
                ("offset", matches.len().to_string()),
                ("limit", CHAMPIONSHIP_PAGE.to_string()),
            ];
            let page: Items<Match> = self.get(url.clone(), &args).await?;

            let count = page.items.len();
            matches.extend(page.items);
            if count < CHAMPIONSHIP_PAGE {
                break;
            }
        }

        tracing::debug!(matches = matches.len(), "Loaded championship matches");
        Ok(matches)
    }

    #[tracing::instrument(skip(self))]
    pub async fn match_details(&self, match_id: &str) -> Result<Match, ApiError> {
        self.get(format!("{}/matches/{}", self.data_url, match_id), &[]).await
    }

    /// Statistics of every map of the match, `None` if the match has none yet.
    #[tracing::instrument(skip(self))]
    pub async fn match_stats(&self, match_id: &str) -> Result<Option<MatchStats>, ApiError> {
        self.request(&format!("{}/matches/{}/stats", self.data_url, match_id), &[])
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn player(&self, nickname: &str) -> Result<Option<Player>, ApiError> {
        let details: Option<PlayerDetails> = self
            .request(
                &format!("{}/players", self.data_url),
                &[("nickname", nickname.to_owned())],
            )
            .await?;
        Ok(details.map(Player::from))
    }

    #[tracing::instrument(skip(self))]
    pub async fn player_by_id(&self, player_id: &str) -> Result<Player, ApiError> {
        let details: PlayerDetails = self
            .get(format!("{}/players/{}", self.data_url, player_id), &[])
            .await?;
        Ok(details.into())
    }

    /// The most recent games of the player, all of them if `count` is `None`.
    #[tracing::instrument(skip(self))]
    pub async fn player_games(&self, player_id: &str, count: Option<usize>) -> Result<Vec<Game>, ApiError> {
        let url = format!("{}/players/{}/history", self.data_url, player_id);

        let mut games: Vec<Game> = Vec::new();
        loop {
            if count.is_some_and(|c| games.len() >= c) {
                break;
            }

            let args = [
                ("game", GAME.to_owned()),
                ("offset", games.len().to_string()),
                ("limit", HISTORY_PAGE.to_string()),
            ];
            let page: Items<Game> = self.get(url.clone(), &args).await?;
            if page.items.is_empty() {
                break;
            }
            games.extend(page.items);

            tokio::time::sleep(PAGE_PAUSE).await;
        }

        if let Some(count) = count {
            games.truncate(count);
        }

        tracing::debug!(games = games.len(), "Loaded player games");
        Ok(games)
    }

    /// Per game statistics of the player from the stats API.
    #[tracing::instrument(skip(self))]
    pub async fn player_statistics(&self, player_id: &str, count: Option<usize>) -> Result<Vec<Statistic>, ApiError> {
        let url = format!("{}/stats/time/users/{}/games/{}", self.stats_url, player_id, GAME);

        let mut statistics: Vec<Statistic> = Vec::new();
        let mut page = 0usize;
        loop {
            if count.is_some_and(|c| statistics.len() >= c) {
                break;
            }

            let args = [("page", page.to_string()), ("size", STATISTICS_PAGE.to_string())];
            let entries: Vec<Statistic> = self.get(url.clone(), &args).await?;
            if entries.is_empty() {
                break;
            }
            statistics.extend(entries);
            page += 1;

            tokio::time::sleep(PAGE_PAUSE).await;
        }

        if let Some(count) = count {
            statistics.truncate(count);
        }

        tracing::debug!(statistics = statistics.len(), "Loaded player statistics");
        Ok(statistics)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}
