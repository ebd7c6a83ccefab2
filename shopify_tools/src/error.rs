use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShopifyApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not complete REST request: {0}")]
    RestResponseError(String),
    #[error("REST request timed out: {0}")]
    Timeout(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Shopify rejected the request: {0}")]
    UserErrors(String),
    #[error("The response from Shopify was empty")]
    EmptyResponse,
    #[error("A product id is required for this request")]
    MissingProductId,
    #[error("Invalid currency amount: {0}")]
    InvalidCurrencyAmount(String),
}

impl ShopifyApiError {
    /// True for failures where re-sending the same request later could succeed: network failures, timeouts,
    /// throttling and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RestResponseError(_) | Self::Timeout(_) => true,
            Self::QueryError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
