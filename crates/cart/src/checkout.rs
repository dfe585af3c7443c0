//! Order submission.
//!
//! Checkout sends the raw cart lines to the catalog service. On an accepted
//! order the receipt is returned right away and a background task clears the
//! cart and closes the drawer once the reset delay has passed, leaving time
//! to show the confirmation. A rejected or failed submission leaves the cart
//! untouched and is not retried.

use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use verto_core::api::CheckoutReceipt;

use crate::cart::ShoppingCart;
use crate::catalog::CatalogApi;
use crate::error::{CartError, Result};

/// An accepted order whose cart reset may still be pending.
#[derive(Debug)]
pub struct PlacedOrder {
    pub receipt: CheckoutReceipt,
    reset: JoinHandle<()>,
}

impl PlacedOrder {
    /// Wait until the cart has been cleared and the drawer closed.
    pub async fn settled(self) {
        if let Err(e) = self.reset.await {
            warn!(error = %e, "Cart reset task did not complete");
        }
    }
}

/// Clears `checking_out` when the submission ends, including when the
/// checkout future is dropped before the service answers.
struct CheckoutGuard<'a, C>(&'a ShoppingCart<C>);

impl<C> Drop for CheckoutGuard<'_, C> {
    fn drop(&mut self) {
        self.0.update(|state| state.checking_out = false);
    }
}

impl<C: CatalogApi + 'static> ShoppingCart<C> {
    /// Submit the current lines as an order.
    ///
    /// Only one submission may be outstanding at a time.
    ///
    /// # Errors
    ///
    /// - `CartError::EmptyCart` if there is nothing to submit
    /// - `CartError::CheckoutInProgress` if another submission is in flight
    /// - `CartError::Catalog` if the service is unreachable or rejects the order
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<PlacedOrder> {
        let (lines, snapshot) = {
            let mut state = self.lock();
            if state.lines.is_empty() {
                return Err(CartError::EmptyCart);
            }
            if state.checking_out {
                return Err(CartError::CheckoutInProgress);
            }
            state.checking_out = true;
            (state.lines.clone(), state.snapshot())
        };
        self.notify(&snapshot);

        let result = {
            let _in_flight = CheckoutGuard(self);
            self.catalog().checkout(&lines).await
        };

        match result {
            Ok(receipt) => {
                info!(
                    order_id = %receipt.order_id,
                    total = %receipt.total_amount,
                    items = receipt.item_count,
                    "Order placed"
                );
                Ok(PlacedOrder {
                    receipt,
                    reset: self.schedule_reset(),
                })
            }
            Err(e) => {
                warn!(error = %e, "Checkout failed");
                Err(e.into())
            }
        }
    }

    fn schedule_reset(&self) -> JoinHandle<()> {
        let cart = self.clone();
        let delay = self.checkout_reset_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            cart.clear();
            cart.close_drawer();
        })
    }
}
