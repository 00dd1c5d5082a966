use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ringline_core::models::{City, Tour, TourInput, TourSummary};
use ringline_core::repository::CatalogRepository;

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CityRow {
    id: i64,
    name: String,
    description: Option<String>,
}

#[derive(sqlx::FromRow)]
struct TourRow {
    id: i64,
    city_id: i64,
    title: String,
    description: Option<String>,
    full_description: Option<String>,
    price: i64,
    duration_days: i32,
    available_seats: i32,
    image_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    city_name: String,
}

#[derive(sqlx::FromRow)]
struct TourSummaryRow {
    id: i64,
    city_id: i64,
    title: String,
    description: Option<String>,
    full_description: Option<String>,
    price: i64,
    duration_days: i32,
    available_seats: i32,
    image_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    city_name: String,
    rating: f64,
    review_count: i64,
}

impl From<TourSummaryRow> for TourSummary {
    fn from(row: TourSummaryRow) -> Self {
        TourSummary {
            tour: Tour {
                id: row.id,
                city_id: row.city_id,
                title: row.title,
                description: row.description,
                full_description: row.full_description,
                price: row.price,
                duration_days: row.duration_days,
                available_seats: row.available_seats,
                image_url: row.image_url,
                created_at: row.created_at,
            },
            city_name: row.city_name,
            rating: row.rating,
            review_count: row.review_count,
        }
    }
}

/// Listing shape: joined city name plus the on-demand review aggregates,
/// computed by correlated subqueries at query time.
const TOUR_SUMMARY_SELECT: &str = "SELECT \
    t.id, t.city_id, t.title, t.description, t.full_description, \
    t.price, t.duration_days, t.available_seats, t.image_url, t.created_at, \
    c.name AS city_name, \
    COALESCE((SELECT AVG(rating)::float8 FROM reviews WHERE tour_id = t.id), 0) AS rating, \
    (SELECT COUNT(*) FROM reviews WHERE tour_id = t.id) AS review_count \
    FROM tours t JOIN cities c ON t.city_id = c.id";

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_cities(&self) -> RepoResult<Vec<City>> {
        let rows =
            sqlx::query_as::<_, CityRow>("SELECT id, name, description FROM cities ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| City {
                id: r.id,
                name: r.name,
                description: r.description,
            })
            .collect())
    }

    async fn list_tours(&self, city_id: Option<i64>) -> RepoResult<Vec<TourSummary>> {
        let rows = match city_id {
            Some(city) => {
                let sql = format!(
                    "{TOUR_SUMMARY_SELECT} WHERE t.city_id = $1 ORDER BY t.created_at DESC"
                );
                sqlx::query_as::<_, TourSummaryRow>(&sql)
                    .bind(city)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{TOUR_SUMMARY_SELECT} ORDER BY t.created_at DESC");
                sqlx::query_as::<_, TourSummaryRow>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(TourSummary::from).collect())
    }

    async fn get_tour(&self, id: i64) -> RepoResult<Option<TourSummary>> {
        let sql = format!("{TOUR_SUMMARY_SELECT} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TourSummaryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TourSummary::from))
    }

    async fn list_tours_admin(&self) -> RepoResult<Vec<(Tour, String)>> {
        let rows = sqlx::query_as::<_, TourRow>(
            "SELECT t.id, t.city_id, t.title, t.description, t.full_description, \
             t.price, t.duration_days, t.available_seats, t.image_url, t.created_at, \
             c.name AS city_name \
             FROM tours t JOIN cities c ON t.city_id = c.id \
             ORDER BY t.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    Tour {
                        id: r.id,
                        city_id: r.city_id,
                        title: r.title,
                        description: r.description,
                        full_description: r.full_description,
                        price: r.price,
                        duration_days: r.duration_days,
                        available_seats: r.available_seats,
                        image_url: r.image_url,
                        created_at: r.created_at,
                    },
                    r.city_name,
                )
            })
            .collect())
    }

    async fn create_tour(&self, input: &TourInput, default_seats: i32) -> RepoResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO tours \
             (city_id, title, description, full_description, price, duration_days, available_seats, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(input.city_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.full_description)
        .bind(input.price)
        .bind(input.duration_days)
        .bind(input.available_seats.unwrap_or(default_seats))
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_tour(&self, id: i64, input: &TourInput) -> RepoResult<()> {
        sqlx::query(
            "UPDATE tours SET \
             city_id = $1, title = $2, description = $3, full_description = $4, \
             price = $5, duration_days = $6, available_seats = $7, image_url = $8, \
             updated_at = NOW() \
             WHERE id = $9",
        )
        .bind(input.city_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.full_description)
        .bind(input.price)
        .bind(input.duration_days)
        .bind(input.available_seats)
        .bind(&input.image_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_tour(&self, id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
