use async_trait::async_trait;
use uuid::Uuid;

use crate::trip::{NewTrip, Trip, TripSearch, TripSummary, TripUpdate};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    #[error("Catalog storage error: {0}")]
    Storage(String),
}

/// Repository trait for trip catalog access
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, CatalogError>;

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, CatalogError>;

    /// Newest-first listing, filtered by optional name/location substrings.
    async fn search_trips(&self, filter: TripSearch) -> Result<Vec<TripSummary>, CatalogError>;

    async fn update_trip(&self, id: Uuid, update: TripUpdate) -> Result<Trip, CatalogError>;

    async fn delete_trip(&self, id: Uuid) -> Result<(), CatalogError>;
}
