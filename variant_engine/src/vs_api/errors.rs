use thiserror::Error;

use crate::{
    synthesis::ValidationError,
    traits::{PlatformError, VariantStoreError},
};

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Shopify rejected the update. {0}")]
    RemoteRejection(String),
    #[error("Could not reach Shopify. {0}")]
    TransientIo(String),
    #[error("Variants were published to Shopify but could not be saved locally. {0}")]
    Persistence(String),
    #[error("Could not update product metafields. {0}")]
    Metafield(String),
    #[error("Product {0} has not been configured for variants")]
    ProductNotFound(i64),
    #[error("No access credential is stored for {0}")]
    MissingCredential(String),
    #[error("{0}")]
    Store(String),
}

impl From<PlatformError> for SyncError {
    fn from(e: PlatformError) -> Self {
        match e {
            PlatformError::Rejected(msg) => SyncError::RemoteRejection(msg),
            PlatformError::Transport(msg) => SyncError::TransientIo(msg),
            PlatformError::InvalidResponse(msg) => SyncError::RemoteRejection(msg),
        }
    }
}

impl From<VariantStoreError> for SyncError {
    fn from(e: VariantStoreError) -> Self {
        match e {
            VariantStoreError::ProductNotFound(id) => SyncError::ProductNotFound(id),
            VariantStoreError::CredentialNotFound(shop) => SyncError::MissingCredential(shop),
            e => SyncError::Store(e.to_string()),
        }
    }
}
