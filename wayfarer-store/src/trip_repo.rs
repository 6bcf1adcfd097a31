use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use wayfarer_catalog::{
    CatalogError, ItineraryDay, NewTrip, TourType, Trip, TripAvailability, TripImage, TripLabel,
    TripRepository, TripSearch, TripSummary, TripUpdate,
};

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    name: String,
    description: String,
    location: String,
    duration: String,
    category: String,
    tour_type: String,
    label: Option<String>,
    price_cents: i64,
    discount_price_cents: Option<i64>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    trip_id: Uuid,
    url: String,
}

#[derive(sqlx::FromRow)]
struct ItineraryRow {
    id: Uuid,
    trip_id: Uuid,
    day_number: i32,
    location: String,
    title: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct AvailabilityRow {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub travel_date: chrono::NaiveDate,
    pub max_travelers: i32,
    pub booked_count: i32,
    pub adult_price_cents: i64,
    pub child_price_cents: i64,
}

impl AvailabilityRow {
    pub(crate) fn into_availability(self) -> TripAvailability {
        TripAvailability {
            id: self.id,
            trip_id: self.trip_id,
            travel_date: self.travel_date,
            max_travelers: self.max_travelers,
            booked_count: self.booked_count,
            adult_price_cents: self.adult_price_cents,
            child_price_cents: self.child_price_cents,
        }
    }
}

fn storage(err: sqlx::Error) -> CatalogError {
    tracing::error!("Catalog query failed: {}", err);
    CatalogError::Storage(err.to_string())
}

impl TripRow {
    fn into_trip(
        self,
        images: Vec<TripImage>,
        itineraries: Vec<ItineraryDay>,
        availabilities: Vec<TripAvailability>,
    ) -> Result<Trip, CatalogError> {
        let tour_type = TourType::parse(&self.tour_type).ok_or_else(|| {
            CatalogError::Storage(format!("unknown tour_type value: {}", self.tour_type))
        })?;
        let label = match self.label {
            Some(raw) => Some(TripLabel::parse(&raw).ok_or_else(|| {
                CatalogError::Storage(format!("unknown label value: {raw}"))
            })?),
            None => None,
        };

        Ok(Trip {
            id: self.id,
            name: self.name,
            description: self.description,
            location: self.location,
            duration: self.duration,
            category: self.category,
            tour_type,
            label,
            price_cents: self.price_cents,
            discount_price_cents: self.discount_price_cents,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images,
            itineraries,
            availabilities,
        })
    }
}

impl PgTripRepository {
    async fn load_trip(&self, id: Uuid) -> Result<Option<Trip>, CatalogError> {
        let row = sqlx::query_as::<_, TripRow>(
            "SELECT id, name, description, location, duration, category, tour_type, label, \
             price_cents, discount_price_cents, created_at, updated_at \
             FROM trips WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let images = sqlx::query_as::<_, ImageRow>(
            "SELECT id, trip_id, url FROM trip_images WHERE trip_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?
        .into_iter()
        .map(|img| TripImage {
            id: img.id,
            trip_id: img.trip_id,
            url: img.url,
        })
        .collect();

        let itineraries = sqlx::query_as::<_, ItineraryRow>(
            "SELECT id, trip_id, day_number, location, title, description \
             FROM trip_itineraries WHERE trip_id = $1 ORDER BY day_number",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?
        .into_iter()
        .map(|day| ItineraryDay {
            id: day.id,
            trip_id: day.trip_id,
            day_number: day.day_number,
            location: day.location,
            title: day.title,
            description: day.description,
        })
        .collect();

        let availabilities = sqlx::query_as::<_, AvailabilityRow>(
            "SELECT id, trip_id, travel_date, max_travelers, booked_count, \
             adult_price_cents, child_price_cents \
             FROM trip_availability WHERE trip_id = $1 ORDER BY travel_date",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?
        .into_iter()
        .map(AvailabilityRow::into_availability)
        .collect();

        row.into_trip(images, itineraries, availabilities).map(Some)
    }
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, CatalogError> {
        let trip_id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query(
            "INSERT INTO trips (id, name, description, location, duration, category, tour_type, \
             label, price_cents, discount_price_cents, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)",
        )
        .bind(trip_id)
        .bind(&new_trip.name)
        .bind(&new_trip.description)
        .bind(&new_trip.location)
        .bind(&new_trip.duration)
        .bind(&new_trip.category)
        .bind(new_trip.tour_type.as_str())
        .bind(new_trip.label.map(|l| l.as_str()))
        .bind(new_trip.price_cents)
        .bind(new_trip.discount_price_cents)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        for url in &new_trip.image_urls {
            sqlx::query("INSERT INTO trip_images (id, trip_id, url) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind(trip_id)
                .bind(url)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        for day in &new_trip.itineraries {
            sqlx::query(
                "INSERT INTO trip_itineraries (id, trip_id, day_number, location, title, description) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(day.day_number)
            .bind(&day.location)
            .bind(&day.title)
            .bind(&day.description)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        }

        for slot in &new_trip.availabilities {
            sqlx::query(
                "INSERT INTO trip_availability (id, trip_id, travel_date, max_travelers, \
                 booked_count, adult_price_cents, child_price_cents) \
                 VALUES ($1, $2, $3, $4, 0, $5, $6)",
            )
            .bind(Uuid::new_v4())
            .bind(trip_id)
            .bind(slot.travel_date)
            .bind(slot.max_travelers)
            .bind(slot.adult_price_cents)
            .bind(slot.child_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;

        self.load_trip(trip_id)
            .await?
            .ok_or(CatalogError::TripNotFound(trip_id))
    }

    async fn find_trip(&self, id: Uuid) -> Result<Option<Trip>, CatalogError> {
        self.load_trip(id).await
    }

    async fn search_trips(&self, filter: TripSearch) -> Result<Vec<TripSummary>, CatalogError> {
        let rows = sqlx::query_as::<_, TripRow>(
            "SELECT id, name, description, location, duration, category, tour_type, label, \
             price_cents, discount_price_cents, created_at, updated_at \
             FROM trips \
             WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
               AND ($2::text IS NULL OR location ILIKE '%' || $2 || '%') \
             ORDER BY created_at DESC",
        )
        .bind(filter.search)
        .bind(filter.location)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let image_urls: Vec<String> = sqlx::query_scalar(
                "SELECT url FROM trip_images WHERE trip_id = $1",
            )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

            let label = match &row.label {
                Some(raw) => TripLabel::parse(raw),
                None => None,
            };
            summaries.push(TripSummary {
                id: row.id,
                name: row.name,
                location: row.location,
                duration: row.duration,
                category: row.category,
                label,
                price_cents: row.price_cents,
                image_urls,
            });
        }

        Ok(summaries)
    }

    async fn update_trip(&self, id: Uuid, update: TripUpdate) -> Result<Trip, CatalogError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?;
        if exists.is_none() {
            return Err(CatalogError::TripNotFound(id));
        }

        sqlx::query(
            "UPDATE trips SET \
             name = COALESCE($2, name), \
             description = COALESCE($3, description), \
             location = COALESCE($4, location), \
             duration = COALESCE($5, duration), \
             category = COALESCE($6, category), \
             tour_type = COALESCE($7, tour_type), \
             label = COALESCE($8, label), \
             price_cents = COALESCE($9, price_cents), \
             discount_price_cents = COALESCE($10, discount_price_cents), \
             updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.description)
        .bind(update.location)
        .bind(update.duration)
        .bind(update.category)
        .bind(update.tour_type.map(|t| t.as_str()))
        .bind(update.label.map(|l| l.as_str()))
        .bind(update.price_cents)
        .bind(update.discount_price_cents)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        // Nested collections are replaced wholesale when provided.
        // Availability rows are deliberately untouched here.
        if let Some(urls) = update.image_urls {
            sqlx::query("DELETE FROM trip_images WHERE trip_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
            for url in urls {
                sqlx::query("INSERT INTO trip_images (id, trip_id, url) VALUES ($1, $2, $3)")
                    .bind(Uuid::new_v4())
                    .bind(id)
                    .bind(url)
                    .execute(&mut *tx)
                    .await
                    .map_err(storage)?;
            }
        }

        if let Some(days) = update.itineraries {
            sqlx::query("DELETE FROM trip_itineraries WHERE trip_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
            for day in days {
                sqlx::query(
                    "INSERT INTO trip_itineraries (id, trip_id, day_number, location, title, description) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(Uuid::new_v4())
                .bind(id)
                .bind(day.day_number)
                .bind(&day.location)
                .bind(&day.title)
                .bind(&day.description)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
            }
        }

        tx.commit().await.map_err(storage)?;

        self.load_trip(id)
            .await?
            .ok_or(CatalogError::TripNotFound(id))
    }

    async fn delete_trip(&self, id: Uuid) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::TripNotFound(id));
        }
        Ok(())
    }
}
