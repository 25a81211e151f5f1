//! Abstract upstream data source and a real HTTP-backed implementation.

pub mod dto;

use crate::error::{FplError, Result};
use async_trait::async_trait;
use dto::{
    BootstrapResponse, EntryDto, EntryHistoryResponse, EntryPicksResponse, FixtureDto,
    TransferRecord,
};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::sync::OnceLock;
use std::time::Duration;

/// FPL serializes several stat fields (`form`, `expected_goals`, ...) as JSON
/// strings. Decode them as floats at the boundary, defaulting missing/empty
/// values to `0.0` as the source service does (`float(x or 0)`).
pub(crate) fn parse_f64_field<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f64),
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(s) if s.is_empty() => Ok(0.0),
        StringOrFloat::String(s) => Ok(s.parse().unwrap_or(0.0)),
        StringOrFloat::Float(f) => Ok(f),
    }
}

/// Abstract, read-only upstream contract. `spec.md` §6.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn get_bootstrap(&self) -> Result<BootstrapResponse>;
    async fn get_fixtures(&self) -> Result<Vec<FixtureDto>>;
    async fn get_entry(&self, entry_id: u32) -> Result<EntryDto>;
    async fn get_entry_picks(&self, entry_id: u32, event: u16) -> Result<EntryPicksResponse>;
    async fn get_entry_transfers(&self, entry_id: u32) -> Result<Vec<TransferRecord>>;
    async fn get_entry_history(&self, entry_id: u32) -> Result<EntryHistoryResponse>;
}

/// Base path for the public Fantasy Premier League API.
pub const FPL_BASE_URL: &str = "https://fantasy.premierleague.com/api";

fn client() -> &'static Client {
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .user_agent("fpl-transfer-planner")
            .build()
            .expect("failed to build http client")
    })
}

/// `reqwest`-backed `DataSource` against the real FPL endpoints, with
/// exponential-backoff retry on timeout/transport error.
pub struct FplHttpSource {
    base_url: String,
    max_retries: u32,
    base_delay: Duration,
}

impl FplHttpSource {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            base_url: FPL_BASE_URL.to_string(),
            max_retries,
            base_delay,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'));

        let mut attempt = 0;
        loop {
            let outcome = client().get(&url).send().await.and_then(|r| r.error_for_status());
            match outcome {
                Ok(response) => return Ok(response.json::<T>().await?),
                Err(err) if attempt + 1 < self.max_retries && is_retryable(&err) => {
                    let delay = self.base_delay * 2u32.pow(attempt);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(FplError::from(err)),
            }
        }
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

#[async_trait]
impl DataSource for FplHttpSource {
    async fn get_bootstrap(&self) -> Result<BootstrapResponse> {
        self.get_json("bootstrap-static/").await
    }

    async fn get_fixtures(&self) -> Result<Vec<FixtureDto>> {
        self.get_json("fixtures/").await
    }

    async fn get_entry(&self, entry_id: u32) -> Result<EntryDto> {
        self.get_json(&format!("entry/{entry_id}/")).await
    }

    async fn get_entry_picks(&self, entry_id: u32, event: u16) -> Result<EntryPicksResponse> {
        self.get_json(&format!("entry/{entry_id}/event/{event}/picks/"))
            .await
    }

    async fn get_entry_transfers(&self, entry_id: u32) -> Result<Vec<TransferRecord>> {
        self.get_json(&format!("entry/{entry_id}/transfers/")).await
    }

    async fn get_entry_history(&self, entry_id: u32) -> Result<EntryHistoryResponse> {
        self.get_json(&format!("entry/{entry_id}/history/")).await
    }
}
