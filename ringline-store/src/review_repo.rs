use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use ringline_core::models::{Review, ReviewWithAuthor};
use ringline_core::repository::ReviewRepository;

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    tour_id: i64,
    user_id: i64,
    rating: i32,
    comment: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            tour_id: row.tour_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewWithAuthorRow {
    id: i64,
    tour_id: i64,
    user_id: i64,
    rating: i32,
    comment: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    user_name: Option<String>,
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn find_for_user(&self, tour_id: i64, user_id: i64) -> RepoResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, tour_id, user_id, rating, comment, created_at, updated_at \
             FROM reviews WHERE tour_id = $1 AND user_id = $2",
        )
        .bind(tour_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    async fn find_owned(&self, review_id: i64, user_id: i64) -> RepoResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, tour_id, user_id, rating, comment, created_at, updated_at \
             FROM reviews WHERE id = $1 AND user_id = $2",
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    async fn list_for_tour(&self, tour_id: i64) -> RepoResult<Vec<ReviewWithAuthor>> {
        let rows = sqlx::query_as::<_, ReviewWithAuthorRow>(
            "SELECT r.id, r.tour_id, r.user_id, r.rating, r.comment, \
             r.created_at, r.updated_at, u.full_name AS user_name \
             FROM reviews r LEFT JOIN users u ON r.user_id = u.id \
             WHERE r.tour_id = $1 \
             ORDER BY r.created_at DESC",
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ReviewWithAuthor {
                review: Review {
                    id: r.id,
                    tour_id: r.tour_id,
                    user_id: r.user_id,
                    rating: r.rating,
                    comment: r.comment,
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                },
                user_name: r.user_name,
            })
            .collect())
    }

    async fn create(
        &self,
        tour_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<&str>,
    ) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO reviews (tour_id, user_id, rating, comment, created_at) \
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(tour_id)
        .bind(user_id)
        .bind(rating)
        .bind(comment)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, review_id: i64, rating: i32, comment: Option<&str>) -> RepoResult<()> {
        sqlx::query("UPDATE reviews SET rating = $1, comment = $2, updated_at = NOW() WHERE id = $3")
            .bind(rating)
            .bind(comment)
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, review_id: i64) -> RepoResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
