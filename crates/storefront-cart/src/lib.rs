//! # storefront-cart: Cart Service
//!
//! Stateful cart service built on the pure rules in `storefront-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Cart Data Flow                          │
//! │                                                                         │
//! │  UI: "add to cart" / "+" / "-" / "remove"                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-cart (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  CartManager  │───►│    ports      │◄───│   adapters   │  │   │
//! │  │   │ (manager.rs)  │    │  StockQuery   │    │ ApiClient    │  │   │
//! │  │   │               │    │  CatalogQuery │    │ FileStore    │  │   │
//! │  │   │ add / remove  │    │  Persistent-  │    │ Memory*      │  │   │
//! │  │   │ update        │    │  Store        │    │              │  │   │
//! │  │   │               │    │  Notifier     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  watch::Receiver<Cart> (UI re-renders)  +  Notification (toasts)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`manager`] - The `CartManager` state container
//! - [`ports`] - Collaborator traits
//! - [`adapters`] - In-memory, file, and HTTP collaborators
//! - [`notify`] - User-facing notifications
//! - [`config`] - Configuration loading
//! - [`error`] - Error types
//! - [`logging`] - Subscriber setup for binaries

pub mod adapters;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod notify;
pub mod ports;

pub use config::{CartConfig, ConfigError, Messages};
pub use error::{CartError, CartResult, LookupError, Operation, StoreError};
pub use manager::{CartDeps, CartManager};
pub use notify::{NoticeLevel, Notification};
pub use ports::{CatalogQuery, Notifier, PersistentStore, StockQuery};
