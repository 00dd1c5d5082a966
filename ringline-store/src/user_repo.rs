use async_trait::async_trait;
use sqlx::PgPool;

use ringline_core::models::{Admin, User};
use ringline_core::repository::{AdminRepository, UserRepository};

type RepoResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    full_name: String,
    email: String,
    phone: String,
    passport: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            passport: row.passport,
            password: row.password,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, full_name, email, phone, passport, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_contact(&self, contact: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, full_name, email, phone, passport, password FROM users \
             WHERE email = $1 OR phone = $1",
        )
        .bind(contact)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, full_name, email, phone, passport, password FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
        passport: &str,
        password_hash: &str,
    ) -> RepoResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (full_name, email, phone, passport, password) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(passport)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_profile(
        &self,
        id: i64,
        full_name: &str,
        email: &str,
        phone: &str,
        passport: &str,
    ) -> RepoResult<()> {
        sqlx::query(
            "UPDATE users SET full_name = $1, email = $2, phone = $3, passport = $4 WHERE id = $5",
        )
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(passport)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepoResult<()> {
        sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn reset_password_by_contact(
        &self,
        contact: &str,
        password_hash: &str,
    ) -> RepoResult<u64> {
        let result = sqlx::query("UPDATE users SET password = $1 WHERE email = $2 OR phone = $2")
            .bind(password_hash)
            .bind(contact)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: i64,
    username: String,
    password: String,
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Admin {
            id: r.id,
            username: r.username,
            password: r.password,
        }))
    }
}
