//! Rich error handling for the marketplace API.
//!
//! Every [`ServiceError`] maps onto exactly one [`ErrorCode`], and every code
//! onto one HTTP status. Bodies always have the same shape:
//! `{code, message, details, retryable}`.
//!
//! # HTTP Status Codes
//!
//! | Status | Codes |
//! |--------|-------|
//! | 400 Bad Request | `EMPTY_ORDER`, `INVALID_QUANTITY`, `INVALID_STATUS`, `INVALID_FIELD`, `INVALID_REQUEST` |
//! | 401 Unauthorized | `UNAUTHENTICATED`, `INVALID_TOKEN`, `INVALID_CREDENTIALS` |
//! | 403 Forbidden | `FORBIDDEN` |
//! | 404 Not Found | `SHOP_NOT_FOUND`, `PRODUCT_NOT_FOUND`, `ORDER_NOT_FOUND` |
//! | 409 Conflict | `SHOP_ALREADY_EXISTS`, `EMAIL_TAKEN`, `INSUFFICIENT_STOCK`, `INVALID_TRANSITION` |
//! | 422 Unprocessable Entity | `SHOP_INACTIVE`, `PRODUCT_INACTIVE`, `PRODUCT_NOT_IN_SHOP`, `SHOP_REQUIRED` |
//! | 500 Internal Server Error | `PERSISTENCE_FAILURE`, `INTERNAL_ERROR` |

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::errors::ServiceError;
use crate::application::ports::AuthError;
use crate::domain::catalog::CatalogError;
use crate::domain::identity::AccessError;
use crate::domain::ordering::OrderError;

/// Error codes exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication (401)
    /// No credential presented.
    Unauthenticated,
    /// Credential unknown or expired.
    InvalidToken,
    /// Email and password do not match.
    InvalidCredentials,

    // Authorization (403)
    /// Wrong role or not the owner.
    Forbidden,

    // Not found (404)
    /// Shop does not exist.
    ShopNotFound,
    /// Product does not exist or was deleted.
    ProductNotFound,
    /// Order does not exist.
    OrderNotFound,

    // Conflicts (409)
    /// User already owns a shop.
    ShopAlreadyExists,
    /// Email already registered.
    EmailTaken,
    /// Not enough stock to fill a line.
    InsufficientStock,
    /// Status change refused by the transition policy.
    InvalidTransition,

    // Ineligible references (422)
    /// Shop is not accepting orders.
    ShopInactive,
    /// Product is switched off.
    ProductInactive,
    /// Product belongs to another shop.
    ProductNotInShop,
    /// User must create a shop first.
    ShopRequired,
    /// Line subtotal or order total is too large to represent.
    AmountTooLarge,

    // Validation (400)
    /// Cart has no items.
    EmptyOrder,
    /// A line asked for zero units.
    InvalidQuantity,
    /// Unrecognized lifecycle status.
    InvalidStatus,
    /// A field failed validation.
    InvalidField,
    /// Malformed request.
    InvalidRequest,

    // Internal (500)
    /// Storage failed; nothing was written.
    PersistenceFailure,
    /// Unexpected server error.
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ShopNotFound | Self::ProductNotFound | Self::OrderNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::ShopAlreadyExists
            | Self::EmailTaken
            | Self::InsufficientStock
            | Self::InvalidTransition => StatusCode::CONFLICT,
            Self::ShopInactive
            | Self::ProductInactive
            | Self::ProductNotInShop
            | Self::ShopRequired
            | Self::AmountTooLarge => StatusCode::UNPROCESSABLE_ENTITY,
            Self::EmptyOrder
            | Self::InvalidQuantity
            | Self::InvalidStatus
            | Self::InvalidField
            | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::PersistenceFailure | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error reason string (also used as a metric label).
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::ShopNotFound => "SHOP_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::ShopAlreadyExists => "SHOP_ALREADY_EXISTS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::ShopInactive => "SHOP_INACTIVE",
            Self::ProductInactive => "PRODUCT_INACTIVE",
            Self::ProductNotInShop => "PRODUCT_NOT_IN_SHOP",
            Self::ShopRequired => "SHOP_REQUIRED",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidField => "INVALID_FIELD",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::PersistenceFailure => "PERSISTENCE_FAILURE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure is the server's fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::PersistenceFailure | Self::InternalError)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

impl From<&ServiceError> for ErrorCode {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::Auth(auth) => match auth {
                AuthError::Unauthenticated => Self::Unauthenticated,
                AuthError::InvalidToken => Self::InvalidToken,
                AuthError::InvalidCredentials => Self::InvalidCredentials,
                AuthError::EmailTaken => Self::EmailTaken,
                AuthError::Hashing(_) => Self::InternalError,
            },
            ServiceError::Access(AccessError::Forbidden { .. }) => Self::Forbidden,
            ServiceError::Order(order) => match order {
                OrderError::EmptyOrder => Self::EmptyOrder,
                OrderError::InvalidQuantity { .. } => Self::InvalidQuantity,
                OrderError::ShopNotFound { .. } => Self::ShopNotFound,
                OrderError::ShopInactive { .. } => Self::ShopInactive,
                OrderError::ProductNotFound { .. } => Self::ProductNotFound,
                OrderError::ProductNotInShop { .. } => Self::ProductNotInShop,
                OrderError::ProductInactive { .. } => Self::ProductInactive,
                OrderError::InsufficientStock { .. } => Self::InsufficientStock,
                OrderError::AmountOverflow { .. } => Self::AmountTooLarge,
                OrderError::OrderNotFound { .. } => Self::OrderNotFound,
                OrderError::InvalidStatus { .. } => Self::InvalidStatus,
                OrderError::InvalidTransition { .. } => Self::InvalidTransition,
            },
            ServiceError::Catalog(catalog) => match catalog {
                CatalogError::ShopNotFound { .. } => Self::ShopNotFound,
                CatalogError::ShopRequired { .. } => Self::ShopRequired,
                CatalogError::ShopAlreadyExists { .. } => Self::ShopAlreadyExists,
                CatalogError::ProductNotFound { .. } => Self::ProductNotFound,
                CatalogError::InvalidField { .. } => Self::InvalidField,
                CatalogError::StockUnderflow { .. } => Self::InsufficientStock,
            },
            ServiceError::Persistence(_) => Self::PersistenceFailure,
            ServiceError::Validation(_) => Self::InvalidRequest,
        }
    }
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Structured context (ids, quantities), rendered as `details`.
    context: BTreeMap<String, Value>,
    /// Whether the client may retry the same request.
    retryable: bool,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: BTreeMap::new(),
            retryable: false,
        }
    }

    /// Add a detail to the error.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Mark the error as retryable.
    #[must_use]
    pub const fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Malformed request body, path or header.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub const fn context(&self) -> &BTreeMap<String, Value> {
        &self.context
    }

    /// Convert to the response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.clone(),
            retryable: self.retryable,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let code = ErrorCode::from(&err);

        if code.is_server_error() {
            // Storage and hashing internals stay in the log.
            tracing::error!(error = %err, code = code.reason(), "Request failed");
            let message = match code {
                ErrorCode::PersistenceFailure => "storage failure, nothing was written",
                _ => "internal error",
            };
            return Self::new(code, message).retryable(err.is_retryable());
        }

        let api = Self::new(code, err.to_string());
        match err {
            ServiceError::Order(OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            }) => api
                .with_detail("product_id", product_id.value())
                .with_detail("requested", requested)
                .with_detail("available", available),
            ServiceError::Catalog(CatalogError::StockUnderflow {
                requested,
                available,
            }) => api
                .with_detail("requested", requested)
                .with_detail("available", available),
            ServiceError::Order(
                OrderError::ProductNotFound { product_id }
                | OrderError::ProductInactive { product_id }
                | OrderError::InvalidQuantity { product_id }
                | OrderError::AmountOverflow { product_id },
            )
            | ServiceError::Catalog(CatalogError::ProductNotFound { product_id }) => {
                api.with_detail("product_id", product_id.value())
            }
            ServiceError::Order(OrderError::ProductNotInShop {
                product_id,
                shop_id,
            }) => api
                .with_detail("product_id", product_id.value())
                .with_detail("shop_id", shop_id.value()),
            ServiceError::Order(
                OrderError::ShopNotFound { shop_id } | OrderError::ShopInactive { shop_id },
            ) => api.with_detail("shop_id", shop_id.value()),
            ServiceError::Order(OrderError::OrderNotFound { order_id }) => {
                api.with_detail("order_id", order_id.value())
            }
            ServiceError::Order(OrderError::InvalidTransition { from, to }) => api
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            ServiceError::Catalog(CatalogError::InvalidField { field, .. }) => {
                api.with_detail("field", field)
            }
            _ => api,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ServiceError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self.to_http_response())).into_response()
    }
}

/// HTTP error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    pub details: BTreeMap<String, Value>,
    /// Whether retrying the same request may succeed.
    pub retryable: bool,
}
