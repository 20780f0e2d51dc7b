//! Application wiring: the store, its persistence, and multi-step flows.
//!
//! The store is built once at startup. The stored snapshot is merged in with
//! `LoadState`, and a [`PersistedStore`] observer writes the state back after
//! every dispatch.

use crate::action::AppAction;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::dashboard::seed_products;
use crate::persistence::{FileStorage, PersistedStore, SnapshotStorage};
use crate::reducer::{AppEnvironment, AppReducer};
use crate::types::{AppState, Order, PaymentMethod, UserPatch};
use learnhub_core::environment::SystemClock;
use learnhub_runtime::{Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The application store
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Slack on top of the configured checkout delay before giving up waiting
const CHECKOUT_GRACE: Duration = Duration::from_secs(5);

/// Why a checkout did not produce an order
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Nobody is signed in
    #[error("Sign in to check out")]
    NotSignedIn,

    /// The cart is empty
    #[error("Your cart is empty")]
    EmptyCart,

    /// A checkout is already being processed
    #[error("A checkout is already in progress")]
    AlreadyPending,

    /// The checkout was cancelled before it completed
    #[error("Checkout was cancelled")]
    Cancelled,

    /// The store rejected the action or timed out
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds a store over `persisted`, restoring any stored snapshot
///
/// # Errors
///
/// Returns [`StoreError`] if the snapshot could not be dispatched.
pub async fn build_store<B>(
    persisted: PersistedStore<B>,
    env: AppEnvironment,
) -> Result<AppStore, StoreError>
where
    B: SnapshotStorage + 'static,
{
    let persisted = Arc::new(persisted);
    let snapshot = persisted.load();

    let store = Store::new(AppState::new(), AppReducer::new(), env).with_observer(persisted);

    if let Some(snapshot) = snapshot {
        store.send(AppAction::LoadState(snapshot)).await?;
    }
    Ok(store)
}

/// Opens the store described by `config`, persisted to files
///
/// # Errors
///
/// Returns [`StoreError`] if the snapshot could not be dispatched.
pub async fn open(config: &Config) -> Result<AppStore, StoreError> {
    let persisted = PersistedStore::with_key(
        FileStorage::new(&config.storage.data_dir),
        config.storage.key.clone(),
    );
    let env = AppEnvironment::new(Arc::new(SystemClock))
        .with_checkout_delay(config.timing.checkout_delay);

    tracing::debug!(data_dir = %config.storage.data_dir.display(), "Opening store");
    build_store(persisted, env).await
}

/// Fills an empty instructor dashboard from the catalog
///
/// Returns true if the dashboard was seeded.
///
/// # Errors
///
/// Returns [`StoreError`] if the store rejects the action.
pub async fn seed_dashboard(store: &AppStore, catalog: &Catalog) -> Result<bool, StoreError> {
    let seed = store.state(|s| seed_products(s, catalog.courses())).await;
    match seed {
        Some(products) => {
            tracing::debug!(count = products.len(), "Seeding dashboard from catalog");
            store.send(AppAction::SetDashboardProducts(products)).await?;
            Ok(true)
        },
        None => Ok(false),
    }
}

/// Checks out the cart and waits for the payment to "process"
///
/// # Errors
///
/// Returns [`CheckoutError`] if there is nothing to check out, the checkout
/// was cancelled, or the store failed.
pub async fn checkout(store: &AppStore, payment_method: PaymentMethod) -> Result<Order, CheckoutError> {
    store
        .state(|s| {
            if !s.is_signed_in() {
                Err(CheckoutError::NotSignedIn)
            } else if s.cart.is_empty() {
                Err(CheckoutError::EmptyCart)
            } else if s.checkout_pending() {
                Err(CheckoutError::AlreadyPending)
            } else {
                Ok(())
            }
        })
        .await?;

    let timeout = store.environment().checkout_delay + CHECKOUT_GRACE;
    let completed = store
        .send_and_wait_for(
            AppAction::Checkout { payment_method },
            |a| matches!(a, AppAction::CheckoutCompleted { .. }),
            timeout,
        )
        .await?;

    let AppAction::CheckoutCompleted { order } = completed else {
        return Err(CheckoutError::Cancelled);
    };
    let recorded = store.state(|s| s.orders.iter().any(|o| o.id == order.id)).await;
    if recorded {
        Ok(order)
    } else {
        Err(CheckoutError::Cancelled)
    }
}

/// Saves profile changes after a simulated round trip
///
/// # Errors
///
/// Returns [`StoreError`] if the store rejects the action.
pub async fn save_profile(store: &AppStore, patch: UserPatch, delay: Duration) -> Result<(), StoreError> {
    tokio::time::sleep(delay).await;
    store.send(AppAction::UpdateUser(patch)).await?;
    Ok(())
}
