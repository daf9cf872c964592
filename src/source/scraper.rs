//! # source::scraper
//!
//! HTTP client for the product-page scraper service.
//!
//! The scraper renders an Alsuper product page, picks the visible price and
//! answers `GET {endpoint}?url=<product url>` with:
//!
//! ```json
//! {
//!   "url": "https://alsuper.com/producto/chorizo-319544",
//!   "product_name": "Chorizo",
//!   "price_per_kg": null,
//!   "unit_price": 18.9,
//!   "unit_pack_size": 1,
//!   "unit_weight_g": 100,
//!   "currency": "MXN",
//!   "raw_unit": "pieza"
//! }
//! ```
//!
//! Anything other than `200 OK` with a decodable body carrying a positive
//! price is a failure.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::{PriceSource, SourceError};
use crate::models::PriceQuote;

pub struct ScraperClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ScraperClient {
    /// `accept_invalid_certs` relaxes TLS validation for scraper deployments
    /// behind a broken certificate chain.
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to build scraper HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

/// Response body of the scraper's `/price` endpoint. Pack size and unit
/// weight are sent too, but packaging comes from the recipe instead.
#[derive(Debug, Deserialize)]
struct ScraperPrice {
    product_name: Option<String>,
    price_per_kg: Option<f64>,
    unit_price: Option<f64>,
    currency: Option<String>,
    raw_unit: Option<String>,
}

impl ScraperPrice {
    fn into_quote(self, source_key: &str) -> Result<PriceQuote, SourceError> {
        let quote = PriceQuote {
            source_key: source_key.to_string(),
            product_name: self.product_name,
            price_per_kg: self.price_per_kg,
            unit_price: self.unit_price,
            currency: self.currency.unwrap_or_default(),
            raw_unit: self.raw_unit,
        };

        if !quote.has_price() {
            return Err(SourceError::NoPrice(source_key.to_string()));
        }
        Ok(quote)
    }
}

#[async_trait]
impl PriceSource for ScraperClient {
    async fn lookup(&self, source_key: &str) -> Result<PriceQuote, SourceError> {
        debug!(source_key, endpoint = %self.endpoint, "Calling price scraper");

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("url", source_key)])
            .send()
            .await
            .map_err(SourceError::Transport)?;

        if resp.status() != StatusCode::OK {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        let body: ScraperPrice = resp
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        body.into_quote(source_key)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const KEY: &str = "https://alsuper.com/producto/chorizo-319544";

    #[test]
    fn test_decodes_unit_priced_product() {
        let body: ScraperPrice = serde_json::from_str(
            r#"{"url":"x","product_name":"Chorizo","unit_price":18.9,
                "unit_pack_size":1,"unit_weight_g":100,"currency":"MXN","raw_unit":"pieza"}"#,
        )
        .unwrap();

        let quote = body.into_quote(KEY).unwrap();
        assert_eq!(quote.source_key, KEY);
        assert_eq!(quote.unit_price, Some(18.9));
        assert_eq!(quote.price_per_kg, None);
        assert_eq!(quote.currency, "MXN");
        assert_eq!(quote.raw_unit.as_deref(), Some("pieza"));
    }

    #[test]
    fn test_missing_currency_is_empty() {
        let body: ScraperPrice = serde_json::from_str(r#"{"price_per_kg":189.0}"#).unwrap();
        let quote = body.into_quote(KEY).unwrap();
        assert_eq!(quote.currency, "");
    }

    #[test]
    fn test_body_without_price_is_a_failure() {
        let body: ScraperPrice =
            serde_json::from_str(r#"{"product_name":"Chorizo","currency":"MXN"}"#).unwrap();
        assert!(matches!(body.into_quote(KEY), Err(SourceError::NoPrice(k)) if k == KEY));
    }

    #[test]
    fn test_builds_client() {
        let client = ScraperClient::new("http://localhost:9/price", Duration::from_secs(1), true);
        assert!(client.is_ok());
    }

    // ─── Against a live HTTP server ───────────────────────────────────────────

    async fn client_for(server: &MockServer) -> ScraperClient {
        ScraperClient::new(&format!("{}/price", server.uri()), Duration::from_secs(5), false)
            .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_sends_product_url_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .and(query_param("url", KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": KEY,
                "product_name": "Chorizo",
                "price_per_kg": null,
                "unit_price": 18.9,
                "currency": "MXN",
                "raw_unit": "pieza"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let quote = client_for(&server).await.lookup(KEY).await.unwrap();
        assert_eq!(quote.source_key, KEY);
        assert_eq!(quote.unit_price, Some(18.9));
        assert_eq!(quote.product_name.as_deref(), Some("Chorizo"));
    }

    #[tokio::test]
    async fn test_lookup_non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup(KEY).await.unwrap_err();
        assert!(matches!(err, SourceError::Status(500)), "{err:?}");
    }

    #[tokio::test]
    async fn test_lookup_garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup(KEY).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_lookup_without_price_is_no_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": KEY,
                "product_name": "Chorizo",
                "currency": "MXN"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup(KEY).await.unwrap_err();
        assert!(matches!(err, SourceError::NoPrice(ref k) if k == KEY), "{err:?}");
    }

    #[tokio::test]
    async fn test_lookup_unreachable_is_transport_error() {
        // Grab a free port, then close it so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/price", listener.local_addr().unwrap());
        drop(listener);

        let client = ScraperClient::new(&endpoint, Duration::from_secs(5), false).unwrap();
        let err = client.lookup(KEY).await.unwrap_err();
        assert!(matches!(err, SourceError::Transport(_)), "{err:?}");
    }
}
