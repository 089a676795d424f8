//! # Cart Service Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  reqwest::Error ──► LookupError ──┐                                     │
//! │  std::io::Error ──► StoreError  ──┼──► CartError ──► Notification       │
//! │  CoreError ───────────────────────┘        │                            │
//! │                                            └──► returned to the caller  │
//! │                                                 (tagged, never panics)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The UI only ever sees the notification text. The tagged `CartError` is
//! for callers and tests that need to know *why* an operation was refused.

use std::fmt;

use serde::{Deserialize, Serialize};
use storefront_core::{CoreError, ProductId, ValidationError};
use thiserror::Error;

// =============================================================================
// Operation
// =============================================================================

/// The cart operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Remove,
    Update,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
            Operation::Update => write!(f, "update"),
        }
    }
}

// =============================================================================
// Lookup Error
// =============================================================================

/// Stock or catalog lookup failures.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The service answered, but has no such resource.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: ProductId },

    /// The request never produced a response (connection refused, timeout).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with an unexpected status code.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be understood.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The backing service is unavailable (used by in-memory fakes).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LookupError::Decode(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Key-value storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store cannot be used at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Cart Error
// =============================================================================

/// Why a cart operation was refused.
///
/// ## Categories
/// - **Stock exceeded** (`StockExceeded`): expected and recoverable. The
///   user sees a warning.
/// - **Operation failure** (everything else): the user sees the generic
///   message for the operation.
///
/// In both cases the cart is left exactly as it was.
#[derive(Debug, Error)]
pub enum CartError {
    /// More units requested than the inventory holds.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The inventory service has no stock record for the product.
    #[error("No stock record for product {0}")]
    StockNotFound(ProductId),

    /// The catalog has no such product.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product has no entry in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested amount is below 1.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// The catalog returned a product that cannot be shown.
    #[error("Invalid product: {0}")]
    InvalidProduct(ValidationError),

    /// Stock or catalog lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Persisting the cart failed.
    #[error("Storage failed: {0}")]
    Storage(#[from] StoreError),

    /// The cart could not be serialized for storage.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// True for the recoverable stock-exceeded condition.
    pub fn is_stock_exceeded(&self) -> bool {
        matches!(self, CartError::StockExceeded { .. })
    }

    /// The product the failure is about, when there is one.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            CartError::StockExceeded { product_id, .. } => Some(*product_id),
            CartError::StockNotFound(id)
            | CartError::ProductNotFound(id)
            | CartError::NotInCart(id) => Some(*id),
            CartError::Lookup(LookupError::NotFound { id, .. }) => Some(*id),
            _ => None,
        }
    }
}

/// Converts cart rule violations to cart errors.
///
/// The manager checks amounts itself before calling into the core, so any
/// validation failure that reaches this point is about product data.
impl From<CoreError> for CartError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StockExceeded {
                product_id,
                requested,
                available,
            } => CartError::StockExceeded {
                product_id,
                requested,
                available,
            },
            CoreError::NotInCart(id) => CartError::NotInCart(id),
            CoreError::Validation(e) => CartError::InvalidProduct(e),
        }
    }
}

/// Result type for cart operations.
pub type CartResult<T> = Result<T, CartError>;

/// Result type for lookups.
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for storage access.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
