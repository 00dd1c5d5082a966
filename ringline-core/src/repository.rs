use async_trait::async_trait;

use crate::models::{
    Admin, City, NewBooking, Review, ReviewWithAuthor, Tour, TourInput, TourSummary, User,
};

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Repository trait for user account access
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Matches `contact` against email OR phone (password recovery flow).
    async fn find_by_contact(&self, contact: &str) -> RepoResult<Option<User>>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Inserts a user with an already-hashed password, returning the new id.
    async fn create(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
        passport: &str,
        password_hash: &str,
    ) -> RepoResult<i64>;

    async fn update_profile(
        &self,
        id: i64,
        full_name: &str,
        email: &str,
        phone: &str,
        passport: &str,
    ) -> RepoResult<()>;

    async fn update_password(&self, id: i64, password_hash: &str) -> RepoResult<()>;

    /// Sets a new password hash wherever email or phone matches `contact`.
    /// Returns the number of rows touched so callers can detect an unknown
    /// contact.
    async fn reset_password_by_contact(
        &self,
        contact: &str,
        password_hash: &str,
    ) -> RepoResult<u64>;
}

/// Repository trait for admin account access
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>>;
}

/// Repository trait for city and tour catalog access
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_cities(&self) -> RepoResult<Vec<City>>;

    /// Public listing with review aggregates, optionally filtered by city,
    /// newest first.
    async fn list_tours(&self, city_id: Option<i64>) -> RepoResult<Vec<TourSummary>>;

    async fn get_tour(&self, id: i64) -> RepoResult<Option<TourSummary>>;

    /// Admin listing: joined city name, no review aggregates.
    async fn list_tours_admin(&self) -> RepoResult<Vec<(Tour, String)>>;

    async fn create_tour(&self, input: &TourInput, default_seats: i32) -> RepoResult<i64>;

    async fn update_tour(&self, id: i64, input: &TourInput) -> RepoResult<()>;

    async fn delete_tour(&self, id: i64) -> RepoResult<()>;
}

/// Repository trait for booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Decrements the tour's seat counter and inserts the booking row in one
    /// transaction. The decrement is conditional on
    /// `available_seats >= ticket_count`; when it matches no row the
    /// transaction is abandoned and `None` is returned, leaving no booking
    /// behind. Seats therefore never go negative, concurrent callers
    /// included.
    async fn create_booking(&self, booking: &NewBooking) -> RepoResult<Option<i64>>;
}

/// Repository trait for review access
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_for_user(&self, tour_id: i64, user_id: i64) -> RepoResult<Option<Review>>;

    /// Returns a review only when it belongs to `user_id`.
    async fn find_owned(&self, review_id: i64, user_id: i64) -> RepoResult<Option<Review>>;

    async fn list_for_tour(&self, tour_id: i64) -> RepoResult<Vec<ReviewWithAuthor>>;

    async fn create(
        &self,
        tour_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<&str>,
    ) -> RepoResult<()>;

    async fn update(&self, review_id: i64, rating: i32, comment: Option<&str>) -> RepoResult<()>;

    async fn delete(&self, review_id: i64) -> RepoResult<()>;
}
