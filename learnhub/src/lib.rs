//! LearnHub: an online course marketplace, as a state container.
//!
//! Users browse a static catalog, keep a cart and a wishlist, buy courses
//! through a simulated checkout, follow lessons in a course player, and
//! manage their own courses on an instructor dashboard.
//!
//! All state lives in a single [`AppState`] owned by a
//! [`Store`](learnhub_runtime::Store) and changes only through
//! [`AppAction`]s handled by [`AppReducer`]. The state is persisted as one
//! JSON snapshot after every dispatch.
//!
//! # Quick Start
//!
//! ```no_run
//! use learnhub::{app, AppAction, Catalog, Config, CourseId, PaymentMethod};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let store = app::open(&config).await?;
//! let catalog = Catalog::bundled()?;
//!
//! store.send(AppAction::SetUser(learnhub::auth::demo_user())).await?;
//! store
//!     .send(AppAction::AddToCart(catalog.find(CourseId::new(1))?.clone()))
//!     .await?;
//!
//! let order = app::checkout(&store, PaymentMethod::Card).await?;
//! println!("Order {} total ${:.2}", order.id, order.total);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod curriculum;
pub mod dashboard;
pub mod persistence;
pub mod reducer;
pub mod routes;
pub mod task;
pub mod types;
pub mod validation;
pub mod views;

// Re-export commonly used types
pub use action::AppAction;
pub use app::AppStore;
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use curriculum::Curriculum;
pub use reducer::{AppEnvironment, AppReducer};
pub use routes::Route;
pub use types::{
    AppState, Course, CourseId, EnrolledCourse, LessonId, Order, OrderId, OrderStatus,
    PaymentMethod, Review, StateSnapshot, User, UserId, UserPatch,
};
pub use views::{CourseFilter, SortKey};
