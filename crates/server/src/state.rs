//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::payment::{PaymentError, PaymentGateway, StripeClient};
use crate::store::{OrderStore, StoreError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("payment gateway: {0}")]
    Payment(#[from] PaymentError),
    #[error("order store: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the payment gateway, and order history.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    gateway: Arc<dyn PaymentGateway>,
    orders: OrderStore,
}

impl AppState {
    /// Create application state backed by Stripe and the configured data
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be built or the data
    /// directory cannot be created.
    pub async fn new(config: ServerConfig) -> Result<Self, StateError> {
        let gateway = Arc::new(StripeClient::new(&config.stripe)?);
        let orders = OrderStore::open(config.data_dir.clone()).await?;
        Ok(Self::with_parts(config, gateway, orders))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn with_parts(
        config: ServerConfig,
        gateway: Arc<dyn PaymentGateway>,
        orders: OrderStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                orders,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get the hosted checkout gateway.
    #[must_use]
    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.inner.gateway.as_ref()
    }

    /// Get the order history store.
    #[must_use]
    pub fn orders(&self) -> &OrderStore {
        &self.inner.orders
    }
}
