//! Pagination utilities for service layer
//!
//! `Pagination` holds validated 1-based page/limit values and derives the
//! offset and the metadata returned alongside a page.

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest offset or limit the database accepts (a signed 64-bit bind).
pub const MAX_WINDOW: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub limit: u64,
}

impl Pagination {
    /// Apply defaults for absent values, reject zero and windows the database cannot address.
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Result<Self, ServiceError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(ServiceError::Validation("page must be a positive integer".into()));
        }
        if limit == 0 {
            return Err(ServiceError::Validation("limit must be a positive integer".into()));
        }
        if limit > MAX_WINDOW {
            return Err(ServiceError::Validation(format!("limit must be at most {MAX_WINDOW}")));
        }
        (page - 1)
            .checked_mul(limit)
            .filter(|offset| *offset <= MAX_WINDOW)
            .ok_or_else(|| ServiceError::Validation("page is out of range for this limit".into()))?;
        Ok(Self { page, limit })
    }

    /// Rows to skip. Bounded by `MAX_WINDOW` for values built through `new`.
    pub fn offset(&self) -> u64 { (self.page - 1).saturating_mul(self.limit).min(MAX_WINDOW) }

    pub fn last_page(&self, total: u64) -> u64 { total.div_ceil(self.limit) }

    pub fn meta(&self, total: u64) -> PageMeta {
        PageMeta { total, page: self.page, last_page: self.last_page(total), per_page: self.limit }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub last_page: u64,
    pub per_page: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}
