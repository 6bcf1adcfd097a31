use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::availability::TripAvailability;
use crate::repository::{CatalogError, TripRepository};
use crate::trip::{ItineraryDay, NewTrip, Trip, TripImage, TripSearch, TripSummary, TripUpdate};

/// In-memory trip store for tests and demos
pub struct InMemoryTripRepository {
    trips: Mutex<HashMap<Uuid, Trip>>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self {
            trips: Mutex::new(HashMap::new()),
        }
    }

    fn build_trip(new_trip: NewTrip) -> Trip {
        let trip_id = Uuid::new_v4();
        let now = Utc::now();
        Trip {
            id: trip_id,
            name: new_trip.name,
            description: new_trip.description,
            location: new_trip.location,
            duration: new_trip.duration,
            category: new_trip.category,
            tour_type: new_trip.tour_type,
            label: new_trip.label,
            price_cents: new_trip.price_cents,
            discount_price_cents: new_trip.discount_price_cents,
            created_at: now,
            updated_at: now,
            images: new_trip
                .image_urls
                .into_iter()
                .map(|url| TripImage {
                    id: Uuid::new_v4(),
                    trip_id,
                    url,
                })
                .collect(),
            itineraries: new_trip
                .itineraries
                .into_iter()
                .map(|day| ItineraryDay {
                    id: Uuid::new_v4(),
                    trip_id,
                    day_number: day.day_number,
                    location: day.location,
                    title: day.title,
                    description: day.description,
                })
                .collect(),
            availabilities: new_trip
                .availabilities
                .into_iter()
                .map(|row| TripAvailability {
                    id: Uuid::new_v4(),
                    trip_id,
                    travel_date: row.travel_date,
                    max_travelers: row.max_travelers,
                    booked_count: 0,
                    adult_price_cents: row.adult_price_cents,
                    child_price_cents: row.child_price_cents,
                })
                .collect(),
        }
    }
}

impl Default for InMemoryTripRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, CatalogError> {
        let trip = Self::build_trip(new_trip);
        let mut trips = self.trips.lock().await;
        trips.insert(trip.id, trip.clone());
        Ok(trip)
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, CatalogError> {
        let trips = self.trips.lock().await;
        Ok(trips.get(&id).cloned())
    }

    async fn search_trips(&self, filter: TripSearch) -> Result<Vec<TripSummary>, CatalogError> {
        let trips = self.trips.lock().await;
        let mut hits: Vec<&Trip> = trips
            .values()
            .filter(|trip| matches(&trip.name, &filter.search))
            .filter(|trip| matches(&trip.location, &filter.location))
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(hits
            .into_iter()
            .map(|trip| TripSummary {
                id: trip.id,
                name: trip.name.clone(),
                location: trip.location.clone(),
                duration: trip.duration.clone(),
                category: trip.category.clone(),
                label: trip.label,
                price_cents: trip.price_cents,
                image_urls: trip.images.iter().map(|img| img.url.clone()).collect(),
            })
            .collect())
    }

    async fn update_trip(&self, id: Uuid, update: TripUpdate) -> Result<Trip, CatalogError> {
        let mut trips = self.trips.lock().await;
        let trip = trips.get_mut(&id).ok_or(CatalogError::TripNotFound(id))?;

        if let Some(name) = update.name {
            trip.name = name;
        }
        if let Some(description) = update.description {
            trip.description = description;
        }
        if let Some(location) = update.location {
            trip.location = location;
        }
        if let Some(duration) = update.duration {
            trip.duration = duration;
        }
        if let Some(category) = update.category {
            trip.category = category;
        }
        if let Some(tour_type) = update.tour_type {
            trip.tour_type = tour_type;
        }
        if let Some(label) = update.label {
            trip.label = Some(label);
        }
        if let Some(price_cents) = update.price_cents {
            trip.price_cents = price_cents;
        }
        if let Some(discount) = update.discount_price_cents {
            trip.discount_price_cents = Some(discount);
        }
        if let Some(urls) = update.image_urls {
            trip.images = urls
                .into_iter()
                .map(|url| TripImage {
                    id: Uuid::new_v4(),
                    trip_id: id,
                    url,
                })
                .collect();
        }
        if let Some(days) = update.itineraries {
            trip.itineraries = days
                .into_iter()
                .map(|day| ItineraryDay {
                    id: Uuid::new_v4(),
                    trip_id: id,
                    day_number: day.day_number,
                    location: day.location,
                    title: day.title,
                    description: day.description,
                })
                .collect();
        }
        trip.updated_at = Utc::now();

        Ok(trip.clone())
    }

    async fn delete_trip(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut trips = self.trips.lock().await;
        trips
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::TripNotFound(id))
    }
}
