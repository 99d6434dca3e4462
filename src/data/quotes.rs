//! Quote-history download.
//!
//! The quote service keys instruments by an exchange-prefixed code (Shanghai
//! listings resolve under prefix `1`, Shenzhen under `0`). The bare code does
//! not tell us the exchange, so we try both variants and keep the first
//! response that looks like a real history.

use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "http://quotes.money.163.com/service/chddata.html";

/// Columns requested from the quote service; ingest only uses the date and
/// close columns, the rest ride along in the persisted raw CSV.
const FIELDS: &str =
    "TCLOSE;HIGH;LOW;TOPEN;LCLOSE;CHG;PCHG;TURNOVER;VOTURNOVER;VATURNOVER;TCAP;MCAP";

/// Exchange prefixes tried in order.
const EXCHANGE_PREFIXES: [&str; 2] = ["1", "0"];

/// Responses shorter than this are error pages or near-empty histories, not
/// usable data.
const MIN_BODY_LEN: usize = 20_000;

pub struct QuoteClient {
    client: Client,
    base_url: String,
}

impl QuoteClient {
    /// Build a client, honoring a `DIPSCAN_QUOTES_URL` override from the
    /// environment (`.env` supported).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var("DIPSCAN_QUOTES_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch one instrument's daily history as CSV text.
    pub fn fetch_history(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<String, AppError> {
        for prefix in EXCHANGE_PREFIXES {
            let resp = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("code", format!("{prefix}{code}")),
                    ("start", start.format("%Y%m%d").to_string()),
                    ("end", end.format("%Y%m%d").to_string()),
                    ("fields", FIELDS.to_string()),
                ])
                .send()
                .map_err(|e| AppError::new(4, format!("Quote request for {code} failed: {e}")))?;

            if !resp.status().is_success() {
                continue;
            }

            let body = resp.text().map_err(|e| {
                AppError::new(4, format!("Failed to read quote response for {code}: {e}"))
            })?;
            if body.len() >= MIN_BODY_LEN {
                return Ok(body);
            }
        }

        Err(AppError::new(
            4,
            format!("No quote history found for {code} under either exchange prefix."),
        ))
    }
}
