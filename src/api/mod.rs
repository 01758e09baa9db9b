//! Backend API surface.
//!
//! There is no backend yet: [`ApiClient`] accepts every call, logs it and
//! answers with an empty successful envelope. Callers go through it anyway
//! so that swapping in a real service only touches this module.

pub mod client;

use serde::{Deserialize, Serialize};

pub use client::ApiClient;

use crate::catalog::Page;

/// Envelope every single-result call answers with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: Option<T>) -> Self {
        Self {
            data,
            error: None,
            success: true,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

/// Envelope for paged listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> PaginatedResponse<T> {
    pub fn empty(page_size: usize) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            total_pages: 0,
        }
    }
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        Self {
            data: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_json_shape() {
        let resp: ApiResponse<String> = ApiResponse::ok(None);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": null, "error": null, "success": true})
        );

        let failed: ApiResponse<()> = ApiResponse::failed("sem conexão");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("sem conexão"));
    }

    #[test]
    fn test_paginated_uses_camel_case() {
        let page: PaginatedResponse<u32> = PaginatedResponse::empty(10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["page"], 1);
    }

    #[test]
    fn test_from_catalog_page() {
        use crate::catalog::{Catalog, MockCatalog, SearchFilters};

        let page = MockCatalog::seeded().search_drivers(&SearchFilters::default(), 1, 2);
        let resp = PaginatedResponse::from(page);
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.total, 5);
        assert_eq!(resp.total_pages, 3);
    }
}
