use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use variant_engine::SyncError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not start the variant sync server. {0}")]
    InitializeError(String),
    #[error("The variant store or storefront failed. {0}")]
    BackendError(String),
    #[error("Invalid variant configuration. {0}")]
    InvalidConfiguration(String),
    #[error("{0} does not exist")]
    NoRecordFound(String),
    #[error("The server stopped unexpectedly. {0}")]
    IOError(#[from] std::io::Error),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<SyncError> for ServerError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::ProductNotFound(id) => Self::NoRecordFound(format!("Product {id}")),
            SyncError::Validation(e) => Self::InvalidConfiguration(e.to_string()),
            e => Self::BackendError(e.to_string()),
        }
    }
}
