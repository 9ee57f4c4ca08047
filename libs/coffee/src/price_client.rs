use chrono::{DateTime, Utc};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Deserialize;

use crate::error::QuoteError;

const DEFAULT_BASE_API: &str = "https://query1.finance.yahoo.com";

// Yahoo rejects requests carrying the default reqwest user agent.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Latest known price for a symbol. Fetched fresh on every request, never
/// cached or persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    pub as_of: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PriceClient {
    client: Client,
    base_api: String,
}

impl PriceClient {
    pub fn new(base_api: String) -> Result<Self, QuoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, base_api })
    }

    /// Create a client from environment variables.
    /// Reads QUOTE_API_BASE_URL, defaulting to the public Yahoo endpoint.
    pub fn from_env() -> Result<Self, QuoteError> {
        let base_api = std::env::var("QUOTE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_API.to_string());

        Self::new(base_api)
    }

    /// Fetch the most recent daily close for `symbol`.
    ///
    /// Asks for a five day window so the last trading day is covered across
    /// weekends and holidays. One request, no retry; the caller decides how
    /// to handle a failure.
    pub async fn fetch_latest(&self, symbol: &str) -> Result<PriceQuote, QuoteError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_api.trim_end_matches('/'),
            symbol
        );

        let res: ChartResponse = self
            .client
            .get(url)
            .query(&[("range", "5d"), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let (price, as_of) = res.latest_close().ok_or_else(|| QuoteError::NoData {
            symbol: symbol.to_string(),
        })?;

        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price,
            as_of,
        })
    }
}

//
// Match the Yahoo chart API JSON
// https://query1.finance.yahoo.com/v8/finance/chart/{symbol}
//
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBars>,
}

#[derive(Debug, Deserialize)]
struct QuoteBars {
    // null entries mark days without a trade
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl ChartResponse {
    fn latest_close(&self) -> Option<(f64, DateTime<Utc>)> {
        let result = self.chart.result.as_deref()?.first()?;
        let bars = result.indicators.quote.first()?;

        result
            .timestamp
            .iter()
            .zip(&bars.close)
            .rev()
            .find_map(|(ts, close)| {
                let close = (*close)?;
                let as_of = DateTime::from_timestamp(*ts, 0)?;
                Some((close, as_of))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn picks_the_latest_close() {
        let res = parse(
            r#"{"chart":{"result":[{"meta":{"symbol":"KC=F"},
                "timestamp":[1709830800,1709917200],
                "indicators":{"quote":[{"close":[301.25,310.5]}]}}],
                "error":null}}"#,
        );

        let (price, as_of) = res.latest_close().unwrap();
        assert_eq!(price, 310.5);
        assert_eq!(as_of, DateTime::from_timestamp(1709917200, 0).unwrap());
    }

    #[test]
    fn skips_trailing_null_closes() {
        let res = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1709830800,1709917200,1710003600],
                "indicators":{"quote":[{"close":[301.25,310.5,null]}]}}],
                "error":null}}"#,
        );

        let (price, as_of) = res.latest_close().unwrap();
        assert_eq!(price, 310.5);
        assert_eq!(as_of, DateTime::from_timestamp(1709917200, 0).unwrap());
    }

    #[test]
    fn empty_result_has_no_close() {
        let res = parse(r#"{"chart":{"result":[],"error":null}}"#);
        assert!(res.latest_close().is_none());

        let res = parse(
            r#"{"chart":{"result":null,
                "error":{"code":"Not Found","description":"No data found"}}}"#,
        );
        assert!(res.latest_close().is_none());
    }

    #[test]
    fn all_null_closes_have_no_close() {
        let res = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1709830800,1709917200],
                "indicators":{"quote":[{"close":[null,null]}]}}],
                "error":null}}"#,
        );
        assert!(res.latest_close().is_none());
    }
}
