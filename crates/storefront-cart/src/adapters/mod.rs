//! # Adapters
//!
//! Concrete collaborators for the [`CartManager`](crate::CartManager).
//!
//! - [`memory`] - In-memory inventory, store, and notifier
//! - [`file`] - File-backed key-value store
//! - [`http`] - Storefront API client for stock and catalog

pub mod file;
pub mod http;
pub mod memory;

pub use file::FileStore;
pub use http::ApiClient;
pub use memory::{MemoryInventory, MemoryNotifier, MemoryStore};
