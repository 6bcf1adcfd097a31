use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-trip, per-date capacity row. `booked_count` only ever moves up,
/// and only through the reservation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripAvailability {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub travel_date: NaiveDate,
    pub max_travelers: i32,
    pub booked_count: i32,
    pub adult_price_cents: i64,
    pub child_price_cents: i64,
}

impl TripAvailability {
    pub fn remaining_seats(&self) -> i32 {
        (self.max_travelers - self.booked_count).max(0)
    }

    /// Whether `seats` more travelers fit on this date.
    pub fn can_fit(&self, seats: i32) -> bool {
        seats > 0 && self.booked_count + seats <= self.max_travelers
    }
}

/// Input row for trip creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAvailability {
    pub travel_date: NaiveDate,
    pub max_travelers: i32,
    pub adult_price_cents: i64,
    pub child_price_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn availability(max: i32, booked: i32) -> TripAvailability {
        TripAvailability {
            id: Uuid::new_v4(),
            trip_id: Uuid::new_v4(),
            travel_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            max_travelers: max,
            booked_count: booked,
            adult_price_cents: 150_00,
            child_price_cents: 90_00,
        }
    }

    #[test]
    fn test_seat_math() {
        let row = availability(10, 8);
        assert_eq!(row.remaining_seats(), 2);
        assert!(row.can_fit(2));
        assert!(!row.can_fit(3));
    }

    #[test]
    fn test_full_date_has_no_room() {
        let row = availability(10, 10);
        assert_eq!(row.remaining_seats(), 0);
        assert!(!row.can_fit(1));
    }

    #[test]
    fn test_zero_seats_never_fit() {
        let row = availability(10, 0);
        assert!(!row.can_fit(0));
        assert!(!row.can_fit(-1));
    }
}
