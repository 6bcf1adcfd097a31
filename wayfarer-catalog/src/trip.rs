use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::{NewAvailability, TripAvailability};

/// How a tour is operated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TourType {
    Group,
    Private,
    SelfGuided,
}

impl TourType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourType::Group => "GROUP",
            TourType::Private => "PRIVATE",
            TourType::SelfGuided => "SELF_GUIDED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "GROUP" => Some(TourType::Group),
            "PRIVATE" => Some(TourType::Private),
            "SELF_GUIDED" => Some(TourType::SelfGuided),
            _ => None,
        }
    }
}

/// Marketing badge shown on trip cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripLabel {
    Featured,
    BestSeller,
    New,
}

impl TripLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripLabel::Featured => "FEATURED",
            TripLabel::BestSeller => "BEST_SELLER",
            TripLabel::New => "NEW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FEATURED" => Some(TripLabel::Featured),
            "BEST_SELLER" => Some(TripLabel::BestSeller),
            "NEW" => Some(TripLabel::New),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripImage {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub day_number: i32,
    pub location: String,
    pub title: String,
    pub description: Option<String>,
}

/// A catalog trip with its eagerly loaded content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub duration: String,
    pub category: String,
    pub tour_type: TourType,
    pub label: Option<TripLabel>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<TripImage>,
    pub itineraries: Vec<ItineraryDay>,
    pub availabilities: Vec<TripAvailability>,
}

/// Listing projection, cheaper than the full trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub duration: String,
    pub category: String,
    pub label: Option<TripLabel>,
    pub price_cents: i64,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItineraryDay {
    pub day_number: i32,
    pub location: String,
    pub title: String,
    pub description: Option<String>,
}

/// Input for trip creation, nested content included
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub description: String,
    pub location: String,
    pub duration: String,
    pub category: String,
    pub tour_type: TourType,
    pub label: Option<TripLabel>,
    pub price_cents: i64,
    pub discount_price_cents: Option<i64>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub itineraries: Vec<NewItineraryDay>,
    #[serde(default)]
    pub availabilities: Vec<NewAvailability>,
}

/// Partial update. Nested collections are replaced wholesale when present;
/// availability rows are never touched here so a catalog edit cannot
/// clobber a live booked count.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub category: Option<String>,
    pub tour_type: Option<TourType>,
    pub label: Option<TripLabel>,
    pub price_cents: Option<i64>,
    pub discount_price_cents: Option<i64>,
    pub image_urls: Option<Vec<String>>,
    pub itineraries: Option<Vec<NewItineraryDay>>,
}

/// Filters for the trip listing
#[derive(Debug, Clone, Default)]
pub struct TripSearch {
    pub search: Option<String>,
    pub location: Option<String>,
}
