//! Form-level gates run on submit

use thiserror::Error;

use crate::catalog::SearchFilters;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Por favor, preencha todos os campos antes de pesquisar.")]
    MissingFields,
}

/// The home-screen search: every field is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub max_value: String,
}

impl SearchQuery {
    pub fn new(
        origin: &str,
        destination: &str,
        date: &str,
        max_value: &str,
    ) -> Result<Self, SearchError> {
        if [origin, destination, date, max_value]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(SearchError::MissingFields);
        }

        Ok(Self {
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            date: date.trim().to_string(),
            max_value: max_value.trim().to_string(),
        })
    }

    pub fn into_filters(self) -> SearchFilters {
        SearchFilters {
            origin: Some(self.origin),
            destination: Some(self.destination),
            date: Some(self.date),
            max_price: Some(self.max_value),
            ..Default::default()
        }
    }
}
