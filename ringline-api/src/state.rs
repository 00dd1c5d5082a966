use std::sync::Arc;

use ringline_core::repository::{
    AdminRepository, BookingRepository, CatalogRepository, ReviewRepository, UserRepository,
};
use ringline_order::BookingService;
use ringline_store::{
    DbClient, PgAdminRepository, PgBookingRepository, PgCatalogRepository, PgReviewRepository,
    PgUserRepository,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub bookings: Arc<BookingService>,
    pub auth: AuthConfig,
    /// Seats a new tour gets when the admin form omits the field.
    pub default_seats: i32,
}

impl AppState {
    pub fn with_postgres(db: &DbClient, auth: AuthConfig, default_seats: i32) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db.pool.clone()));
        let admins: Arc<dyn AdminRepository> = Arc::new(PgAdminRepository::new(db.pool.clone()));
        let catalog: Arc<dyn CatalogRepository> =
            Arc::new(PgCatalogRepository::new(db.pool.clone()));
        let reviews: Arc<dyn ReviewRepository> = Arc::new(PgReviewRepository::new(db.pool.clone()));
        let booking_repo: Arc<dyn BookingRepository> =
            Arc::new(PgBookingRepository::new(db.pool.clone()));
        let bookings = Arc::new(BookingService::new(catalog.clone(), booking_repo));

        Self {
            users,
            admins,
            catalog,
            reviews,
            bookings,
            auth,
            default_seats,
        }
    }
}
