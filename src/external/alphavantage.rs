use crate::config::AlphaVantageConfig;
use crate::external::price_provider::{PriceProvider, PriceProviderError, RawDailyQuote};
use crate::models::Symbol;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const OPEN_FIELD: &str = "1. open";
const CLOSE_FIELD: &str = "4. close";
const VOLUME_FIELD: &str = "6. volume";

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    domain: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(config: &AlphaVantageConfig) -> Result<Self, PriceProviderError> {
        let mut builder = reqwest::Client::builder();
        if let Some(proxy) = &config.http_proxy {
            builder = builder.proxy(
                reqwest::Proxy::http(proxy).map_err(|e| PriceProviderError::Network(e.to_string()))?,
            );
        }
        if let Some(proxy) = &config.https_proxy {
            builder = builder.proxy(
                reqwest::Proxy::https(proxy).map_err(|e| PriceProviderError::Network(e.to_string()))?,
            );
        }
        let client = builder
            .build()
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            domain: config.domain.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct AvDailyResponse {
    // Bars stay untyped so a malformed day only drops that day.
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, Value>>,

    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // Newer throttle / premium-endpoint message
    #[serde(rename = "Information")]
    information: Option<String>,

    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

/// Parse a TIME_SERIES_DAILY_ADJUSTED body into raw quotes, oldest first.
pub fn parse_daily_response(body: &str) -> Result<Vec<RawDailyQuote>, PriceProviderError> {
    let response: AvDailyResponse =
        serde_json::from_str(body).map_err(|e| PriceProviderError::Parse(e.to_string()))?;

    let Some(series) = response.time_series else {
        if let Some(msg) = response.error_message {
            return Err(PriceProviderError::Api(msg));
        }
        if let Some(msg) = response.note.or(response.information) {
            return Err(PriceProviderError::RateLimited(msg));
        }
        return Err(PriceProviderError::MissingTimeSeries);
    };

    // BTreeMap iterates "YYYY-MM-DD" keys in ascending order
    Ok(series
        .into_iter()
        .map(|(date, bar)| RawDailyQuote {
            open: field_text(&bar, OPEN_FIELD),
            close: field_text(&bar, CLOSE_FIELD),
            volume: field_text(&bar, VOLUME_FIELD),
            date,
        })
        .collect())
}

fn field_text(bar: &Value, field: &str) -> Option<String> {
    match bar.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    async fn fetch_daily_quotes(&self, symbol: Symbol) -> Result<Vec<RawDailyQuote>, PriceProviderError> {
        let url = format!("{}/query", self.domain);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY_ADJUSTED"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
                ("outputsize", "compact"),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if status != StatusCode::OK {
            return Err(PriceProviderError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_daily_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_time_series_in_date_order() {
        let body = r#"{
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-03-19": {"1. open": "191.49", "4. close": "193.34", "6. volume": "5317341"},
                "2024-03-18": {"1. open": "191.70", "4. close": "191.69", "6. volume": "5410562"}
            }
        }"#;

        let quotes = parse_daily_response(body).unwrap();

        assert_eq!(
            quotes,
            vec![
                RawDailyQuote {
                    date: "2024-03-18".into(),
                    open: Some("191.70".into()),
                    close: Some("191.69".into()),
                    volume: Some("5410562".into()),
                },
                RawDailyQuote {
                    date: "2024-03-19".into(),
                    open: Some("191.49".into()),
                    close: Some("193.34".into()),
                    volume: Some("5317341".into()),
                },
            ]
        );
    }

    #[test]
    fn test_missing_and_numeric_fields() {
        let body = r#"{"Time Series (Daily)": {
            "2024-03-18": {"1. open": 191.7, "4. close": "191.69"},
            "2024-03-19": "garbage"
        }}"#;

        let quotes = parse_daily_response(body).unwrap();

        assert_eq!(quotes[0].open.as_deref(), Some("191.7"));
        assert_eq!(quotes[0].volume, None);
        assert_eq!(quotes[1].open, None);
    }

    #[test]
    fn test_missing_time_series() {
        let err = parse_daily_response(r#"{"Meta Data": {}}"#).unwrap_err();
        assert!(matches!(err, PriceProviderError::MissingTimeSeries));
    }

    #[test]
    fn test_throttle_and_error_payloads() {
        let err = parse_daily_response(r#"{"Note": "Thank you for using Alpha Vantage!"}"#).unwrap_err();
        assert!(matches!(err, PriceProviderError::RateLimited(_)));

        let err = parse_daily_response(r#"{"Information": "rate limit reached"}"#).unwrap_err();
        assert!(matches!(err, PriceProviderError::RateLimited(_)));

        let err = parse_daily_response(r#"{"Error Message": "Invalid API call."}"#).unwrap_err();
        assert!(matches!(err, PriceProviderError::Api(msg) if msg == "Invalid API call."));
    }

    #[test]
    fn test_non_json_body() {
        let err = parse_daily_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, PriceProviderError::Parse(_)));
    }
}
