use thiserror::Error;
use uuid::Uuid;

use crate::products::ProductsError;

pub const BAD_REQUEST: u16 = 400;
pub const NOT_FOUND: u16 = 404;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Tagged error: `status` and `message` are reported to the caller verbatim.
    #[error("{message}")]
    Rpc { status: u16, message: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn rpc(status: u16, message: impl Into<String>) -> Self {
        Self::Rpc { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::rpc(BAD_REQUEST, message) }

    pub fn order_not_found(id: Uuid) -> Self {
        Self::rpc(NOT_FOUND, format!("Order with ID {id} not found"))
    }

    /// The `(status, message)` pair when this error is tagged.
    pub fn tagged(&self) -> Option<(u16, &str)> {
        match self {
            Self::Rpc { status, message } => Some((*status, message.as_str())),
            _ => None,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(msg),
            models::errors::ModelError::Db(msg) => Self::Db(msg),
        }
    }
}

/// Upstream rejections keep the status the Products service reported; everything else is a 400.
impl From<ProductsError> for ServiceError {
    fn from(e: ProductsError) -> Self {
        match e {
            ProductsError::Rejected { status, message } => Self::Rpc { status, message },
            other => Self::bad_request(other.to_string()),
        }
    }
}
