//! Placeholder client for the future marketplace backend
//!
//! Every method logs the request at debug level and succeeds without data.

use std::path::Path;

use chrono::Utc;

use super::{ApiResponse, PaginatedResponse};
use crate::booking::HireForm;
use crate::catalog::SearchFilters;
use crate::models::{DriverListing, DriverProfile, Freight, FreightStatus, Role, User};

/// Page size the backend will use for driver searches
const SEARCH_PAGE_SIZE: usize = 10;

/// Storage bucket for uploaded documents
const DOCUMENT_BUCKET: &str = "documentos";

#[derive(Debug, Default, Clone)]
pub struct ApiClient;

impl ApiClient {
    pub fn new() -> Self {
        Self
    }

    pub async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        name: &str,
        role: Role,
    ) -> ApiResponse<User> {
        tracing::debug!("API sign_up email={} name={} role={}", email, name, role.as_str());
        ApiResponse::ok(None)
    }

    pub async fn sign_in(&self, email: &str, _password: &str) -> ApiResponse<User> {
        tracing::debug!("API sign_in email={}", email);
        ApiResponse::ok(None)
    }

    pub async fn sign_out(&self) -> ApiResponse<()> {
        tracing::debug!("API sign_out");
        ApiResponse::ok(None)
    }

    pub async fn search_drivers(
        &self,
        filters: &SearchFilters,
    ) -> PaginatedResponse<DriverListing> {
        tracing::debug!("API search_drivers {:?}", filters);
        PaginatedResponse::empty(SEARCH_PAGE_SIZE)
    }

    pub async fn driver_by_id(&self, id: u32) -> ApiResponse<DriverListing> {
        tracing::debug!("API driver_by_id id={}", id);
        ApiResponse::ok(None)
    }

    pub async fn register_driver(&self, profile: &DriverProfile) -> ApiResponse<DriverProfile> {
        tracing::debug!(
            "API register_driver vehicle={} area={}",
            profile.vehicle_type,
            profile.service_area
        );
        ApiResponse::ok(None)
    }

    pub async fn book_freight(&self, driver_id: u32, form: &HireForm) -> ApiResponse<Freight> {
        tracing::debug!(
            "API book_freight driver={} {} -> {} on {}",
            driver_id,
            form.origin,
            form.destination,
            form.date
        );
        ApiResponse::ok(None)
    }

    pub async fn my_freights(&self, user_id: &str) -> ApiResponse<Vec<Freight>> {
        tracing::debug!("API my_freights user={}", user_id);
        ApiResponse::ok(Some(Vec::new()))
    }

    pub async fn driver_freights(&self, driver_id: &str) -> ApiResponse<Vec<Freight>> {
        tracing::debug!("API driver_freights driver={}", driver_id);
        ApiResponse::ok(Some(Vec::new()))
    }

    pub async fn update_freight_status(
        &self,
        freight_id: u32,
        status: FreightStatus,
    ) -> ApiResponse<Freight> {
        tracing::debug!(
            "API update_freight_status id={} status={}",
            freight_id,
            status.as_str()
        );
        ApiResponse::ok(None)
    }

    /// Returns the storage path the document will live at.
    pub async fn upload_document(&self, file: &Path, user_id: &str) -> ApiResponse<String> {
        let Some(name) = file.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            tracing::debug!("API upload_document rejected {}", file.display());
            return ApiResponse::failed("Arquivo sem nome");
        };
        let path = format!(
            "{}/{}/{}-{}",
            DOCUMENT_BUCKET,
            user_id,
            Utc::now().timestamp_millis(),
            name
        );
        tracing::debug!("API upload_document file={} -> {}", file.display(), path);
        ApiResponse::ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tokio_test::block_on;

    #[test]
    fn test_auth_calls_succeed_without_data() {
        let api = ApiClient::new();
        let resp = block_on(api.sign_in("joao@teste.com", "123456"));
        assert!(resp.success);
        assert!(resp.data.is_none());
        assert!(resp.error.is_none());

        assert!(block_on(api.sign_up("a@b.com", "x", "Ana", Role::Driver)).success);
        assert!(block_on(api.sign_out()).success);
    }

    #[test]
    fn test_search_is_an_empty_first_page() {
        let api = ApiClient::new();
        let page = block_on(api.search_drivers(&SearchFilters::default()));
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_freight_lists_are_empty() {
        let api = ApiClient::new();
        assert_eq!(block_on(api.my_freights("1")).data, Some(Vec::new()));
        assert_eq!(block_on(api.driver_freights("2")).data, Some(Vec::new()));
        assert!(block_on(api.update_freight_status(201, FreightStatus::Scheduled)).success);
        assert!(block_on(api.book_freight(3, &HireForm::default())).data.is_none());
    }

    #[test]
    fn test_upload_returns_storage_path() {
        let api = ApiClient::new();
        let resp = block_on(api.upload_document(&PathBuf::from("/tmp/cnh.jpg"), "2"));
        let path = resp.data.unwrap();
        assert!(path.starts_with("documentos/2/"));
        assert!(path.ends_with("-cnh.jpg"));
    }

    #[test]
    fn test_upload_without_file_name_fails() {
        let api = ApiClient::new();
        let resp = block_on(api.upload_document(&PathBuf::from("/"), "2"));
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.error.as_deref(), Some("Arquivo sem nome"));
    }
}
