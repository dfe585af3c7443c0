//! Order placement.
//!
//! No payment or fulfilment happens here: the order is priced against the
//! current catalog, logged, and acknowledged with a generated id. Lines for
//! unknown products are still accepted and priced at zero.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use tracing::{debug, info, instrument};
use verto_core::api::{CheckoutReceipt, CheckoutRequest};
use verto_core::{CartLine, Price, Product, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequestId;
use crate::state::AppState;

const INVALID_CART: &str = "Invalid cart data. Expected cartItems array.";
const CHECKOUT_FAILED: &str = "Checkout failed. Please try again.";
const ORDER_PLACED: &str = "Order placed successfully!";
const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// One order line resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PricedLine<'a> {
    id: ProductId,
    name: &'a str,
    quantity: u32,
    line_total: Price,
}

impl<'a> PricedLine<'a> {
    fn new(line: &CartLine, products: &'a [Product]) -> Self {
        let product = products.iter().find(|p| p.id == line.id);
        let (name, unit_price) =
            product.map_or((UNKNOWN_PRODUCT, Price::ZERO), |p| (p.name.as_str(), p.price));

        Self {
            id: line.id,
            name,
            quantity: line.quantity(),
            line_total: unit_price.times(line.quantity()),
        }
    }
}

/// Price the submitted lines and acknowledge the order.
///
/// Any body that does not decode to `{cartItems: [{id, quantity}]}` with
/// positive quantities is a 400.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutReceipt>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Undecodable checkout body");
        AppError::BadRequest(INVALID_CART.to_string())
    })?;

    let products = state
        .catalog()
        .products()
        .await
        .map_err(AppError::catalog(CHECKOUT_FAILED))?;

    let priced: Vec<PricedLine<'_>> = request
        .cart_items
        .iter()
        .map(|line| PricedLine::new(line, &products))
        .collect();
    let total: Price = priced.iter().map(|line| line.line_total).sum();

    let placed_at = Utc::now();
    let order_id = format!("ORDER-{}", placed_at.timestamp_millis());

    info!(
        %order_id,
        %request_id,
        placed_at = %placed_at.to_rfc3339(),
        lines = priced.len(),
        %total,
        "Order received"
    );
    for line in &priced {
        info!(
            %order_id,
            product_id = %line.id,
            product = line.name,
            quantity = line.quantity,
            line_total = %line.line_total,
            "Order line"
        );
    }

    Ok(Json(CheckoutReceipt {
        success: true,
        message: ORDER_PLACED.to_string(),
        order_id,
        total_amount: total,
        item_count: priced.len(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use verto_core::api::ApiError;

    use super::*;
    use crate::routes::test_support::{post_json, send, state, state_with_data};

    async fn rejected(body: &str) -> (StatusCode, ApiError) {
        send(state(), post_json("/api/checkout", body)).await
    }

    #[tokio::test]
    async fn test_prices_order_against_catalog() {
        let body = r#"{"cartItems":[{"id":1,"quantity":2},{"id":4,"quantity":1}]}"#;
        let (status, receipt): (_, CheckoutReceipt) =
            send(state(), post_json("/api/checkout", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(receipt.success);
        assert_eq!(receipt.message, ORDER_PLACED);
        assert!(receipt.order_id.starts_with("ORDER-"));
        assert!(receipt.order_id["ORDER-".len()..].parse::<i64>().is_ok());
        assert_eq!(receipt.total_amount, Price::from_units(134_900 * 2 + 64_999));
        assert_eq!(receipt.item_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_product_is_priced_at_zero() {
        let body = r#"{"cartItems":[{"id":999,"quantity":3},{"id":6,"quantity":1}]}"#;
        let (status, receipt): (_, CheckoutReceipt) =
            send(state(), post_json("/api/checkout", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt.total_amount, Price::from_units(36_999));
        assert_eq!(receipt.item_count, 2);
    }

    #[tokio::test]
    async fn test_item_count_is_lines_not_units() {
        let body = r#"{"cartItems":[{"id":2,"quantity":5}]}"#;
        let (_, receipt): (_, CheckoutReceipt) =
            send(state(), post_json("/api/checkout", body)).await;
        assert_eq!(receipt.item_count, 1);
    }

    #[tokio::test]
    async fn test_empty_order_is_accepted() {
        let (status, receipt): (_, CheckoutReceipt) =
            send(state(), post_json("/api/checkout", r#"{"cartItems":[]}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(receipt.total_amount, Price::ZERO);
        assert_eq!(receipt.item_count, 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_400() {
        for body in [
            "{}",
            r#"{"cartItems":"nope"}"#,
            r#"{"cartItems":[{"id":1}]}"#,
            r#"{"cartItems":[{"id":1,"quantity":0}]}"#,
            r#"{"cartItems":[{"id":1,"quantity":-2}]}"#,
            "not json",
        ] {
            let (status, error) = rejected(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert!(!error.success);
            assert_eq!(error.message, INVALID_CART);
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_is_500() {
        let state = state_with_data(std::path::Path::new("/nonexistent/verto/items.json"));
        let body = r#"{"cartItems":[{"id":1,"quantity":1}]}"#;
        let (status, error): (_, ApiError) = send(state, post_json("/api/checkout", body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, CHECKOUT_FAILED);
    }

    #[test]
    fn test_priced_line() {
        let products = vec![Product {
            id: ProductId::new(1),
            name: "Phone".to_string(),
            price: Price::from_units(100),
            img_url: String::new(),
            description: String::new(),
            category: String::new(),
            storage: String::new(),
            camera: String::new(),
            battery: String::new(),
        }];
        let line: CartLine = serde_json::from_str(r#"{"id":1,"quantity":3}"#).unwrap();

        let priced = PricedLine::new(&line, &products);
        assert_eq!(priced.name, "Phone");
        assert_eq!(priced.line_total, Price::from_units(300));

        let missing: CartLine = serde_json::from_str(r#"{"id":2,"quantity":3}"#).unwrap();
        let priced = PricedLine::new(&missing, &products);
        assert_eq!(priced.name, UNKNOWN_PRODUCT);
        assert_eq!(priced.line_total, Price::ZERO);
    }
}
