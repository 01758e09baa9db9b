//! Driver and freight catalog
//!
//! Views ask a [`Catalog`] for data instead of embedding it, so the in-memory
//! [`MockCatalog`] can be replaced by a backend-driven implementation.

mod seed;

use thiserror::Error;

use crate::models::{
    DriverListing, Freight, FreightAction, FreightStatus, Review, TransitionError, VehicleClass,
};
use crate::validation::parse_amount;

/// Default number of drivers per result page
pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("freight {0} not found")]
    FreightNotFound(u32),
    #[error("driver {0} not found")]
    DriverNotFound(u32),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
}

/// Driver search filters. Origin, destination and date are carried along for
/// display; they do not narrow the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: Option<String>,
    /// Maximum price as typed by the user (e.g. "R$ 500,00")
    pub max_price: Option<String>,
    /// Exact vehicle capacity class in kg
    pub vehicle_kg: Option<u32>,
    pub min_capacity_kg: Option<u32>,
    pub min_rating: Option<f32>,
    pub verified_only: bool,
}

impl SearchFilters {
    pub fn matches(&self, driver: &DriverListing) -> bool {
        if let Some(max) = self.max_price.as_deref().and_then(parse_amount) {
            if driver.price as f64 > max * 100.0 {
                return false;
            }
        }
        if let Some(kg) = self.vehicle_kg {
            if driver.capacity_kg != kg {
                return false;
            }
        }
        if let Some(min) = self.min_capacity_kg {
            if driver.capacity_kg < min {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if driver.rating < min {
                return false;
            }
        }
        !self.verified_only || driver.verified
    }
}

/// One page of results. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    fn slice(all: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let total = all.len();
        let items = all
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Self {
            items,
            total,
            page,
            page_size,
        }
    }
}

/// Driver dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    New,
    Active,
    Finished,
}

impl DashboardTab {
    pub fn includes(&self, status: FreightStatus) -> bool {
        match self {
            DashboardTab::New => status == FreightStatus::Pending,
            DashboardTab::Active => {
                matches!(status, FreightStatus::Scheduled | FreightStatus::InProgress)
            }
            DashboardTab::Finished => status == FreightStatus::Completed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::New => "Fretes Novos",
            DashboardTab::Active => "Em Andamento",
            DashboardTab::Finished => "Finalizados",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            DashboardTab::New => "Nenhum frete novo disponível",
            DashboardTab::Active => "Nenhum frete em andamento",
            DashboardTab::Finished => "Nenhum frete finalizado hoje",
        }
    }
}

/// Source of drivers, freights and reviews
pub trait Catalog {
    fn search_drivers(
        &self,
        filters: &SearchFilters,
        page: usize,
        page_size: usize,
    ) -> Page<DriverListing>;
    fn driver(&self, id: u32) -> Option<DriverListing>;
    fn reviews(&self, driver_id: u32) -> Vec<Review>;
    fn vehicle_classes(&self) -> Vec<VehicleClass>;
    fn freight(&self, id: u32) -> Option<Freight>;
    fn client_freights(&self, client_id: &str) -> Vec<Freight>;
    fn driver_freights(&self, driver_id: &str) -> Vec<Freight>;
    fn apply(&mut self, freight_id: u32, action: FreightAction) -> Result<Freight, CatalogError>;
    fn add_review(&mut self, driver_id: u32, review: Review) -> Result<(), CatalogError>;

    /// A driver's freights for one dashboard tab.
    fn dashboard(&self, driver_id: &str, tab: DashboardTab) -> Vec<Freight> {
        self.driver_freights(driver_id)
            .into_iter()
            .filter(|f| tab.includes(f.status))
            .collect()
    }
}

/// In-memory catalog backed by the seed data
pub struct MockCatalog {
    drivers: Vec<DriverListing>,
    reviews: Vec<(u32, Review)>,
    freights: Vec<Freight>,
    vehicles: Vec<VehicleClass>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MockCatalog {
    pub fn seeded() -> Self {
        let drivers = seed::drivers();
        let reviews = drivers
            .iter()
            .flat_map(|d| seed::reviews().into_iter().map(move |r| (d.id, r)))
            .collect();

        Self {
            drivers,
            reviews,
            freights: seed::freights(),
            vehicles: seed::vehicle_classes(),
        }
    }
}

impl Catalog for MockCatalog {
    fn search_drivers(
        &self,
        filters: &SearchFilters,
        page: usize,
        page_size: usize,
    ) -> Page<DriverListing> {
        let matching: Vec<DriverListing> = self
            .drivers
            .iter()
            .filter(|d| filters.matches(d))
            .cloned()
            .collect();
        tracing::debug!("Driver search matched {} of {}", matching.len(), self.drivers.len());
        Page::slice(matching, page, page_size)
    }

    fn driver(&self, id: u32) -> Option<DriverListing> {
        self.drivers.iter().find(|d| d.id == id).cloned()
    }

    fn reviews(&self, driver_id: u32) -> Vec<Review> {
        self.reviews
            .iter()
            .filter(|(id, _)| *id == driver_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn vehicle_classes(&self) -> Vec<VehicleClass> {
        self.vehicles.clone()
    }

    fn freight(&self, id: u32) -> Option<Freight> {
        self.freights.iter().find(|f| f.id == id).cloned()
    }

    fn client_freights(&self, client_id: &str) -> Vec<Freight> {
        self.freights
            .iter()
            .filter(|f| f.client_id == client_id)
            .cloned()
            .collect()
    }

    fn driver_freights(&self, driver_id: &str) -> Vec<Freight> {
        self.freights
            .iter()
            .filter(|f| f.driver_id == driver_id)
            .cloned()
            .collect()
    }

    fn apply(&mut self, freight_id: u32, action: FreightAction) -> Result<Freight, CatalogError> {
        let freight = self
            .freights
            .iter_mut()
            .find(|f| f.id == freight_id)
            .ok_or(CatalogError::FreightNotFound(freight_id))?;

        let next = freight.status.apply(action)?;
        tracing::info!(
            "Freight {}: {} -> {}",
            freight_id,
            freight.status.as_str(),
            next.as_str()
        );
        freight.status = next;
        Ok(freight.clone())
    }

    fn add_review(&mut self, driver_id: u32, review: Review) -> Result<(), CatalogError> {
        let driver = self
            .drivers
            .iter_mut()
            .find(|d| d.id == driver_id)
            .ok_or(CatalogError::DriverNotFound(driver_id))?;

        let total = driver.rating * driver.review_count as f32 + review.score as f32;
        driver.review_count += 1;
        driver.rating = total / driver.review_count as f32;

        self.reviews.push((driver_id, review));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unfiltered_search_pages_through_all_drivers() {
        let catalog = MockCatalog::seeded();
        let page = catalog.search_drivers(&SearchFilters::default(), 1, 2);

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 3);

        let last = catalog.search_drivers(&SearchFilters::default(), 3, 2);
        assert_eq!(last.items.len(), 1);

        let past_end = catalog.search_drivers(&SearchFilters::default(), 9, 2);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[test]
    fn test_max_price_filter_uses_amount_parsing() {
        let catalog = MockCatalog::seeded();
        let filters = SearchFilters {
            max_price: Some("R$ 150,00".to_string()),
            ..Default::default()
        };
        let page = catalog.search_drivers(&filters, 1, DEFAULT_PAGE_SIZE);
        let names: Vec<_> = page.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["João Silva", "Maria Santos"]);
    }

    #[test]
    fn test_unparseable_max_price_is_ignored() {
        let catalog = MockCatalog::seeded();
        let filters = SearchFilters {
            max_price: Some("barato".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.search_drivers(&filters, 1, 10).total, 5);
    }

    #[test]
    fn test_vehicle_and_quality_filters() {
        let catalog = MockCatalog::seeded();

        let by_vehicle = SearchFilters {
            vehicle_kg: Some(2500),
            ..Default::default()
        };
        let page = catalog.search_drivers(&by_vehicle, 1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Carlos Oliveira");

        let strict = SearchFilters {
            min_rating: Some(9.0),
            verified_only: true,
            ..Default::default()
        };
        assert!(catalog
            .search_drivers(&strict, 1, 10)
            .items
            .iter()
            .all(|d| d.verified && d.rating >= 9.0));
    }

    #[test]
    fn test_dashboard_tabs() {
        let catalog = MockCatalog::seeded();
        assert_eq!(catalog.dashboard("2", DashboardTab::New).len(), 2);
        assert_eq!(catalog.dashboard("2", DashboardTab::Active).len(), 1);
        assert!(catalog.dashboard("2", DashboardTab::Finished).is_empty());
        assert!(catalog.dashboard("nobody", DashboardTab::New).is_empty());
    }

    #[test]
    fn test_apply_moves_freight_through_dashboard() {
        let mut catalog = MockCatalog::seeded();
        let pending = catalog.dashboard("2", DashboardTab::New)[0].id;

        let accepted = catalog.apply(pending, FreightAction::Accept).unwrap();
        assert_eq!(accepted.status, FreightStatus::Scheduled);
        assert_eq!(catalog.dashboard("2", DashboardTab::New).len(), 1);
        assert_eq!(catalog.dashboard("2", DashboardTab::Active).len(), 2);

        let err = catalog.apply(pending, FreightAction::Finish).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidTransition(_)));

        assert_eq!(
            catalog.apply(9999, FreightAction::Accept).unwrap_err(),
            CatalogError::FreightNotFound(9999)
        );
    }

    #[test]
    fn test_client_freights() {
        let catalog = MockCatalog::seeded();
        let mine = catalog.client_freights("1");
        assert_eq!(mine.len(), 3);
        assert!(mine.iter().any(|f| f.status == FreightStatus::Completed));
        assert_eq!(catalog.freight(mine[0].id).as_ref(), Some(&mine[0]));
        assert!(catalog.freight(9999).is_none());
    }

    #[test]
    fn test_add_review_updates_average() {
        let mut catalog = MockCatalog::seeded();
        let before = catalog.driver(3).unwrap();
        let review = Review::new(
            "João Silva",
            10,
            None,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )
        .unwrap();

        catalog.add_review(3, review).unwrap();

        let after = catalog.driver(3).unwrap();
        assert_eq!(after.review_count, before.review_count + 1);
        assert!(after.rating > before.rating);
        assert_eq!(catalog.reviews(3).len(), 4);

        let stray = catalog.reviews(3).remove(0);
        assert_eq!(
            catalog.add_review(42, stray).unwrap_err(),
            CatalogError::DriverNotFound(42)
        );
    }
}
