use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use ringline_core::models::NewBooking;
use ringline_core::repository::BookingRepository;

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, booking: &NewBooking) -> RepoResult<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        // Check-and-decrement as a single conditional statement. Matching no
        // row means the seats ran out; the CHECK constraint can never fire.
        let decremented = sqlx::query(
            "UPDATE tours SET available_seats = available_seats - $1 \
             WHERE id = $2 AND available_seats >= $1",
        )
        .bind(booking.ticket_count)
        .bind(booking.tour_id)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            tx.rollback().await?;
            info!(
                tour_id = booking.tour_id,
                requested = booking.ticket_count,
                "booking rejected: not enough seats"
            );
            return Ok(None);
        }

        let booking_id: i64 = sqlx::query_scalar(
            "INSERT INTO bookings (user_id, tour_id, ticket_count, total_price, customer_email) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(booking.user_id)
        .bind(booking.tour_id)
        .bind(booking.ticket_count)
        .bind(booking.total_price)
        .bind(&booking.customer_email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(booking_id, tour_id = booking.tour_id, "booking created");
        Ok(Some(booking_id))
    }
}
