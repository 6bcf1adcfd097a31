pub mod availability;
pub mod memory;
pub mod repository;
pub mod trip;

pub use availability::{NewAvailability, TripAvailability};
pub use memory::InMemoryTripRepository;
pub use repository::{CatalogError, TripRepository};
pub use trip::{
    ItineraryDay, NewItineraryDay, NewTrip, TourType, Trip, TripImage, TripLabel, TripSearch,
    TripSummary, TripUpdate,
};
