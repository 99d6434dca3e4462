//! Instrument universe discovery.
//!
//! The listing service returns one JSON page covering every listed code
//! (field `f12` per row). Used when no codes are passed on the command line,
//! and exposed directly as the `universe` subcommand.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_URL: &str = "http://44.push2.eastmoney.com/api/qt/clist/get?pn=1&pz=10000&po=1&np=1&ut=bd1d9ddb04089700cf9c27f6f7426281&fltt=2&invt=2&fid=f3&fs=m:0+t:6,m:0+t:13,m:0+t:80,m:1+t:2,m:1+t:23&fields=f12";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct UniverseClient {
    client: Client,
    url: String,
}

impl UniverseClient {
    /// Build a client, honoring a `DIPSCAN_UNIVERSE_URL` override from the
    /// environment (`.env` supported).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let url =
            std::env::var("DIPSCAN_UNIVERSE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self {
            client: Client::new(),
            url,
        }
    }

    /// Fetch every listed instrument code.
    pub fn fetch_codes(&self) -> Result<Vec<String>, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .map_err(|e| AppError::new(4, format!("Universe request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Universe request failed with status {}.", resp.status()),
            ));
        }

        let body: ListResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse universe response: {e}")))?;

        let data = body
            .data
            .ok_or_else(|| AppError::new(4, "Universe response carried no data."))?;

        Ok(data.diff.into_iter().map(|row| row.code).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    diff: Vec<ListRow>,
}

#[derive(Debug, Deserialize)]
struct ListRow {
    #[serde(rename = "f12")]
    code: String,
}
