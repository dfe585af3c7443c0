//! JSON envelopes for the catalog HTTP surface.
//!
//! Every response carries a `success` flag. Failures add a human-readable
//! `message`; successes carry the payload fields next to the flag.
//!
//! ```text
//! GET  /api/products  -> {"success":true,"data":[...],"count":N}
//! POST /api/checkout  <- {"cartItems":[{"id":1,"quantity":2}]}
//!                     -> {"success":true,"message":"...","orderId":"ORDER-...","totalAmount":..,"itemCount":N}
//! GET  /api/health    -> {"success":true,"message":"...","timestamp":"..."}
//! any failure         -> {"success":false,"message":"..."}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CartLine, Price, Product};

/// The part of every response a client inspects first.
///
/// Unknown fields are ignored so it can be parsed out of any envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failure body returned with 4xx/5xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub success: bool,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub data: Vec<Product>,
    pub count: usize,
}

impl ProductsResponse {
    #[must_use]
    pub fn new(data: Vec<Product>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Order submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart_items: Vec<CartLine>,
}

/// Successful order acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub order_id: String,
    pub total_amount: Price,
    /// Number of distinct lines in the order, not the unit count.
    pub item_count: usize,
}

/// Liveness probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
