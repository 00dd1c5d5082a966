use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered customer. The password field always holds a bcrypt hash,
/// never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Catalog administrator. Credentials are bcrypt-hashed like user ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Static reference data: a destination city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A bookable tour tied to one city. Prices are whole rubles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub city_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub price: i64,
    pub duration_days: i32,
    pub available_seats: i32,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Tour as it appears in listings: joined city name plus the on-demand
/// review aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourSummary {
    #[serde(flatten)]
    pub tour: Tour,
    pub city_name: String,
    pub rating: f64,
    pub review_count: i64,
}

/// Fields of a booking before it has an id. Bookings are insert-only;
/// nothing reads them back after the confirmation is returned.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub tour_id: i64,
    pub ticket_count: i32,
    pub total_price: i64,
    pub customer_email: String,
}

/// One review per (tour, user) pair, rating in [1, 5].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub tour_id: i64,
    pub user_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Review joined with its author's display name for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub user_name: Option<String>,
}

/// Mutable tour fields, shared by admin create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct TourInput {
    pub city_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub price: i64,
    pub duration_days: i32,
    pub available_seats: Option<i32>,
    pub image_url: Option<String>,
}
