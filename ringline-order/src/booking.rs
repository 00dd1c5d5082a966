use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ringline_core::models::{NewBooking, TourSummary};
use ringline_core::repository::{BookingRepository, CatalogRepository};

use crate::confirmation;

/// Booking failures. Messages are the user-facing Russian strings.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Тур не найден")]
    TourNotFound,

    #[error("Недостаточно мест")]
    InsufficientSeats,

    #[error("Ошибка сервера: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// What the client submits to book a tour. The total is the client's own
/// computation and is persisted as received.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBooking {
    pub tour_id: i64,
    pub ticket_count: i32,
    pub total_price: i64,
    pub customer_email: String,
}

/// Outcome of a successful booking, ready for client display.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub booking_details: String,
    pub alert_message: String,
}

/// The one multi-step write sequence in the system: fetch the tour, insert
/// the booking and decrement seats, then synthesize the confirmation texts.
pub struct BookingService {
    catalog: Arc<dyn CatalogRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(catalog: Arc<dyn CatalogRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { catalog, bookings }
    }

    pub async fn place(
        &self,
        user_id: i64,
        req: PlaceBooking,
    ) -> Result<BookingConfirmation, OrderError> {
        let tour: TourSummary = self
            .catalog
            .get_tour(req.tour_id)
            .await
            .map_err(OrderError::Store)?
            .ok_or(OrderError::TourNotFound)?;

        if tour.tour.available_seats < req.ticket_count {
            return Err(OrderError::InsufficientSeats);
        }

        let new_booking = NewBooking {
            user_id,
            tour_id: req.tour_id,
            ticket_count: req.ticket_count,
            total_price: req.total_price,
            customer_email: req.customer_email.clone(),
        };

        // The repository re-checks availability atomically; a None here means
        // another booking won the remaining seats between our read and the
        // conditional decrement.
        let booking_id = self
            .bookings
            .create_booking(&new_booking)
            .await
            .map_err(OrderError::Store)?
            .ok_or(OrderError::InsufficientSeats)?;

        Ok(BookingConfirmation {
            booking_id,
            booking_details: confirmation::booking_details(booking_id, &tour, &new_booking),
            alert_message: confirmation::alert_message(&tour, &new_booking),
        })
    }
}
