//! Exchange rate lookup for the optional converted price column.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};
use wreq::Client;

/// USD to ZAR rate used when no live rate is available.
pub const USD_ZAR_FALLBACK: f64 = 18.50;

/// A resolved conversion from the listing currency into another one.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Target currency code
    pub code: String,
    /// Units of target currency per unit of listing currency
    pub rate: f64,
    /// True when the rate came from a fallback constant
    pub is_fallback: bool,
}

impl Conversion {
    /// Converts an amount, rounded to cents.
    pub fn apply(&self, amount: f64) -> f64 {
        (amount * self.rate * 100.0).round() / 100.0
    }
}

#[derive(Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

/// Built-in rate for a currency pair, if one is known.
pub fn known_fallback(from: &str, to: &str) -> Option<f64> {
    match (from.to_uppercase().as_str(), to.to_uppercase().as_str()) {
        ("USD", "ZAR") => Some(USD_ZAR_FALLBACK),
        ("ZAR", "USD") => Some(1.0 / USD_ZAR_FALLBACK),
        (a, b) if a == b => Some(1.0),
        _ => None,
    }
}

/// Fetches the live rate `from -> to` from an exchangerate-api style endpoint.
pub async fn fetch_rate(client: &Client, api_base: &str, from: &str, to: &str) -> Result<f64> {
    let url = format!("{}/v4/latest/{}", api_base.trim_end_matches('/'), from.to_uppercase());

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .context("Failed to request exchange rate")?;

    if !response.status().is_success() {
        anyhow::bail!("Exchange rate request failed with status: {}", response.status());
    }

    let body = response.text().await.context("Failed to read exchange rate body")?;
    let latest: LatestRates =
        serde_json::from_str(&body).context("Failed to parse exchange rate response")?;

    latest
        .rates
        .get(&to.to_uppercase())
        .copied()
        .with_context(|| format!("No {} rate in response", to.to_uppercase()))
}

/// Resolves a conversion, falling back to a configured or built-in rate.
///
/// Returns `None` when neither a live nor a fallback rate exists.
pub async fn resolve(
    client: &Client,
    api_base: &str,
    from: &str,
    to: &str,
    configured_fallback: Option<f64>,
) -> Option<Conversion> {
    let code = to.to_uppercase();

    match fetch_rate(client, api_base, from, to).await {
        Ok(rate) => {
            info!("Using live {} to {} rate: {}", from, code, rate);
            return Some(Conversion { code, rate, is_fallback: false });
        }
        Err(e) => warn!("Exchange rate lookup failed: {:#}", e),
    }

    let rate = configured_fallback.or_else(|| known_fallback(from, to))?;
    info!("Using fallback {} to {} rate: {}", from, code, rate);
    Some(Conversion { code, rate, is_fallback: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_known_fallback() {
        assert_eq!(known_fallback("usd", "zar"), Some(18.50));
        assert_eq!(known_fallback("ZAR", "ZAR"), Some(1.0));
        assert!(known_fallback("ZAR", "USD").unwrap() < 0.06);
        assert_eq!(known_fallback("EUR", "JPY"), None);
    }

    #[test]
    fn test_conversion_apply() {
        let conversion = Conversion { code: "ZAR".to_string(), rate: 18.5, is_fallback: true };
        assert_eq!(conversion.apply(10.0), 185.0);
        assert_eq!(conversion.apply(0.5), 9.25);
    }

    #[tokio::test]
    async fn test_fetch_rate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/ZAR"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"base":"ZAR","rates":{"USD":0.055,"EUR":0.05}}"#),
            )
            .mount(&mock_server)
            .await;

        let client = Client::builder().build().unwrap();
        let rate = fetch_rate(&client, &mock_server.uri(), "zar", "usd").await.unwrap();
        assert_eq!(rate, 0.055);
    }

    #[tokio::test]
    async fn test_fetch_rate_missing_currency() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rates":{"EUR":0.05}}"#))
            .mount(&mock_server)
            .await;

        let client = Client::builder().build().unwrap();
        let err = fetch_rate(&client, &mock_server.uri(), "ZAR", "GBP").await.unwrap_err();
        assert!(err.to_string().contains("No GBP rate"));
    }

    #[tokio::test]
    async fn test_resolve_uses_fallback_on_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = Client::builder().build().unwrap();
        let conversion = resolve(&client, &mock_server.uri(), "USD", "ZAR", None).await.unwrap();
        assert!(conversion.is_fallback);
        assert_eq!(conversion.rate, USD_ZAR_FALLBACK);
        assert_eq!(conversion.code, "ZAR");

        let conversion =
            resolve(&client, &mock_server.uri(), "ZAR", "EUR", Some(0.049)).await.unwrap();
        assert_eq!(conversion.rate, 0.049);

        assert!(resolve(&client, &mock_server.uri(), "ZAR", "JPY", None).await.is_none());
    }
}
