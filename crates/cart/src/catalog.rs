//! Catalog service client.
//!
//! Uses `reqwest` for HTTP. Every response carries a `success` flag; a
//! non-2xx status or `success: false` is a failure, reported with the
//! server's `message` when one is present.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;
use verto_core::api::{Acknowledgement, CheckoutReceipt, CheckoutRequest, HealthResponse, ProductsResponse};
use verto_core::{CartLine, Product};

/// Request timeout for catalog calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never got a response.
    #[error("Network error. Please check if the backend server is running. ({0})")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{}", status_message(.status, .message.as_deref()))]
    Status { status: u16, message: Option<String> },

    /// The service answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The response body was not the expected JSON.
    #[error("Invalid response from catalog service: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL is unusable.
    #[error("Invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}

#[allow(clippy::trivially_copy_pass_by_ref)] // thiserror hands fields over by reference
fn status_message(status: &u16, message: Option<&str>) -> String {
    message.map_or_else(|| format!("HTTP error! status: {status}"), str::to_string)
}

/// The catalog operations the cart depends on.
pub trait CatalogApi: Send + Sync {
    /// Fetch the full product list.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Submit the cart lines as an order.
    fn checkout(
        &self,
        lines: &[CartLine],
    ) -> impl Future<Output = Result<CheckoutReceipt, CatalogError>> + Send;
}

// =============================================================================
// CatalogClient
// =============================================================================

/// HTTP client for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the service rooted at `base_url`
    /// (e.g. `http://localhost:5000`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the HTTP client fails
    /// to build.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let mut base_url = Url::parse(base_url)?;

        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The service root this client talks to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        Ok(self.base_url.join(path)?)
    }

    /// Call the liveness probe.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or reports failure.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<HealthResponse, CatalogError> {
        let response = self.client.get(self.endpoint("api/health")?).send().await?;
        decode(response, "Health check failed").await
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .client
            .get(self.endpoint("api/products")?)
            .send()
            .await?;

        let body: ProductsResponse = decode(response, "Failed to fetch products").await?;
        debug!(count = body.data.len(), "Fetched catalog");
        Ok(body.data)
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn checkout(&self, lines: &[CartLine]) -> Result<CheckoutReceipt, CatalogError> {
        let request = CheckoutRequest {
            cart_items: lines.to_vec(),
        };

        let response = self
            .client
            .post(self.endpoint("api/checkout")?)
            .json(&request)
            .send()
            .await?;

        decode(response, "Checkout failed").await
    }
}

/// Turn a response into `T`, mapping status and `success` failures to errors.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback_message: &str,
) -> Result<T, CatalogError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Acknowledgement>(&body)
            .ok()
            .and_then(|ack| ack.message);
        tracing::warn!(
            status = %status,
            body = %body.chars().take(200).collect::<String>(),
            "Catalog service returned non-success status"
        );
        return Err(CatalogError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let ack: Acknowledgement = serde_json::from_str(&body)?;
    if !ack.success {
        return Err(CatalogError::Rejected(
            ack.message.unwrap_or_else(|| fallback_message.to_string()),
        ));
    }

    Ok(serde_json::from_str(&body)?)
}
