use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsError {
    #[error("products service unreachable: {0}")]
    Transport(String),
    /// The Products service answered with its own `{ status, message }` error.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("products service responded with {0}: {1}")]
    Status(u16, String),
    #[error("invalid products response: {0}")]
    Decode(String),
    #[error("Products not found: {}", .0.join(", "))]
    Missing(Vec<String>),
}
