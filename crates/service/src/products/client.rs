use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

use super::errors::ProductsError;

/// Product record as reported by the Products service. Never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub price: f64,
    pub name: String,
}

fn id_from_string_or_number<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Int(i64),
    }
    Ok(match Id::deserialize(de)? {
        Id::Str(s) => s,
        Id::Int(n) => n.to_string(),
    })
}

/// Outbound port to the Products service.
#[async_trait]
pub trait ProductsClient: Send + Sync {
    /// Resolve the given ids in a single round trip.
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductsError>;
}

/// JSON-over-HTTP client: `POST {base_url}/products/validate` with an array of ids.
#[derive(Clone)]
pub struct HttpProductsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpProductsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    fn validate_url(&self) -> String {
        format!("{}/products/validate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProductsClient for HttpProductsClient {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductsError> {
        let res = self
            .http
            .post(self.validate_url())
            .json(ids)
            .send()
            .await
            .map_err(|e| ProductsError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(rejection_from_body(status.as_u16(), &body));
        }

        let products = res
            .json::<Vec<Product>>()
            .await
            .map_err(|e| ProductsError::Decode(e.to_string()))?;
        debug!(resolved = products.len(), "products resolved");
        Ok(products)
    }
}

/// Relay a `{ status, message }` error body; anything else becomes a plain status error.
fn rejection_from_body(status: u16, body: &str) -> ProductsError {
    #[derive(Deserialize)]
    struct ErrorBody {
        status: Option<u16>,
        message: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { status: tagged, message }) => {
            let message = match message {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            ProductsError::Rejected { status: tagged.unwrap_or(status), message }
        }
        Err(_) => ProductsError::Status(status, body.to_string()),
    }
}

/// In-memory catalog for tests and local runs.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Returns only the products it knows, like a lenient upstream; records every request.
    #[derive(Default)]
    pub struct StaticProductsClient {
        products: HashMap<String, Product>,
        unreachable: bool,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl StaticProductsClient {
        pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
            Self {
                products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
                ..Default::default()
            }
        }

        /// A client whose every call fails at the transport level.
        pub fn unreachable() -> Self {
            Self { unreachable: true, ..Default::default() }
        }

        /// Ids requested per call, in call order.
        pub async fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().await.clone()
        }
    }

    pub fn product(id: &str, price: f64, name: &str) -> Product {
        Product { id: id.into(), price, name: name.into() }
    }

    #[async_trait]
    impl ProductsClient for StaticProductsClient {
        async fn validate_products(&self, ids: &[String]) -> Result<Vec<Product>, ProductsError> {
            self.calls.lock().await.push(ids.to_vec());
            if self.unreachable {
                return Err(ProductsError::Transport("connection refused".into()));
            }
            Ok(ids.iter().filter_map(|id| self.products.get(id).cloned()).collect())
        }
    }
}
