use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use bigdecimal::BigDecimal;
use log::debug;
use serde::Deserialize;
use url::Url;

use crate::utils::{
    decimal_from_f64, validate_price_change, validate_sol_price, PERCENT_SCALE, PRICE_SCALE,
};

/// SOL/USD price and its 24h change in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SolQuote {
    pub price: BigDecimal,
    pub change_24h: BigDecimal,
}

#[derive(Debug, Deserialize)]
struct SimplePriceResponse {
    solana: Option<SimplePrice>,
}

#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// CoinGecko simple-price client for the SOL quote.
#[derive(Clone)]
pub struct CoinGeckoFeed {
    client: reqwest::Client,
    url: Url,
}

impl CoinGeckoFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut url = Url::parse(base_url)
            .with_context(|| format!("Invalid price feed URL: {}", base_url))?;
        url.query_pairs_mut()
            .append_pair("ids", "solana")
            .append_pair("vs_currencies", "usd")
            .append_pair("include_24hr_change", "true");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build price feed HTTP client")?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the current SOL quote. No retries: a failure is reported as-is.
    pub async fn fetch_quote(&self) -> Result<SolQuote> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Price feed request failed")?
            .error_for_status()
            .context("Price feed returned an error status")?
            .text()
            .await
            .context("Failed to read price feed response")?;

        let quote = parse_quote(&body)?;
        debug!(
            "Fetched SOL quote: ${} ({}% 24h)",
            quote.price, quote.change_24h
        );
        Ok(quote)
    }
}

/// Parse a simple-price response body into a validated quote.
pub fn parse_quote(body: &str) -> Result<SolQuote> {
    let response: SimplePriceResponse =
        serde_json::from_str(body).context("Malformed price feed response")?;

    let solana = response
        .solana
        .ok_or_else(|| anyhow!("Price feed response has no `solana` entry"))?;

    let price = solana
        .usd
        .and_then(validate_sol_price)
        .and_then(|p| decimal_from_f64(p, PRICE_SCALE))
        .ok_or_else(|| anyhow!("Price feed returned an invalid SOL price: {:?}", solana.usd))?;

    let change_24h = solana
        .usd_24h_change
        .and_then(validate_price_change)
        .and_then(|c| decimal_from_f64(c, PERCENT_SCALE))
        .ok_or_else(|| {
            anyhow!(
                "Price feed returned an invalid 24h change: {:?}",
                solana.usd_24h_change
            )
        })?;

    Ok(SolQuote { price, change_24h })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_decimal;

    #[test]
    fn test_url_carries_query() {
        let feed = CoinGeckoFeed::new(
            "https://api.coingecko.com/api/v3/simple/price",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            feed.url().as_str(),
            "https://api.coingecko.com/api/v3/simple/price?ids=solana&vs_currencies=usd&include_24hr_change=true"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(CoinGeckoFeed::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_parse_quote() {
        let quote =
            parse_quote(r#"{"solana":{"usd":142.37,"usd_24h_change":-3.14159}}"#).unwrap();

        assert_eq!(quote.price, parse_decimal("142.37").unwrap());
        assert_eq!(quote.price.to_string(), "142.370000");
        assert_eq!(quote.change_24h.to_string(), "-3.14");
    }

    #[test]
    fn test_parse_quote_rejects_missing_or_bad_values() {
        assert!(parse_quote(r#"{}"#).is_err());
        assert!(parse_quote(r#"{"solana":{"usd_24h_change":1.0}}"#).is_err());
        assert!(parse_quote(r#"{"solana":{"usd":0,"usd_24h_change":1.0}}"#).is_err());
        assert!(parse_quote(r#"{"solana":{"usd":140.0}}"#).is_err());
        assert!(parse_quote("<html>rate limited</html>").is_err());
    }
}
