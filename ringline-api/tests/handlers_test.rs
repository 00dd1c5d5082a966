//! Handler tests over in-memory repositories: the duplicate and ownership
//! rules that live in the handlers themselves, exercised without Postgres.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use ringline_api::state::{AppState, AuthConfig};
use ringline_api::{app, security};
use ringline_core::models::{
    Admin, City, NewBooking, Review, ReviewWithAuthor, Tour, TourInput, TourSummary, User,
};
use ringline_core::repository::{
    AdminRepository, BookingRepository, CatalogRepository, ReviewRepository, UserRepository,
};
use ringline_order::BookingService;

const TEST_SECRET: &str = "test-secret";

type RepoError = Box<dyn std::error::Error + Send + Sync>;

struct FakeUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_contact(&self, contact: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == contact || u.phone == contact)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(
        &self,
        full_name: &str,
        email: &str,
        phone: &str,
        passport: &str,
        password_hash: &str,
    ) -> Result<i64, RepoError> {
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i64 + 1;
        users.push(User {
            id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            passport: passport.to_string(),
            password: password_hash.to_string(),
        });
        Ok(id)
    }

    async fn update_profile(
        &self,
        _id: i64,
        _full_name: &str,
        _email: &str,
        _phone: &str,
        _passport: &str,
    ) -> Result<(), RepoError> {
        Ok(())
    }

    async fn update_password(&self, _id: i64, _password_hash: &str) -> Result<(), RepoError> {
        Ok(())
    }

    async fn reset_password_by_contact(
        &self,
        _contact: &str,
        _password_hash: &str,
    ) -> Result<u64, RepoError> {
        Ok(0)
    }
}

struct FakeAdmins;

#[async_trait]
impl AdminRepository for FakeAdmins {
    async fn find_by_username(&self, _username: &str) -> Result<Option<Admin>, RepoError> {
        Ok(None)
    }
}

struct FakeCatalog {
    tours: Mutex<Vec<(Tour, String)>>,
}

#[async_trait]
impl CatalogRepository for FakeCatalog {
    async fn list_cities(&self) -> Result<Vec<City>, RepoError> {
        Ok(vec![])
    }

    async fn list_tours(&self, _city_id: Option<i64>) -> Result<Vec<TourSummary>, RepoError> {
        Ok(vec![])
    }

    async fn get_tour(&self, id: i64) -> Result<Option<TourSummary>, RepoError> {
        Ok(self
            .tours
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t.id == id)
            .map(|(t, city)| TourSummary {
                tour: t.clone(),
                city_name: city.clone(),
                rating: 0.0,
                review_count: 0,
            }))
    }

    async fn list_tours_admin(&self) -> Result<Vec<(Tour, String)>, RepoError> {
        Ok(self.tours.lock().unwrap().clone())
    }

    async fn create_tour(
        &self,
        _input: &TourInput,
        _default_seats: i32,
    ) -> Result<i64, RepoError> {
        Ok(1)
    }

    async fn update_tour(&self, _id: i64, _input: &TourInput) -> Result<(), RepoError> {
        Ok(())
    }

    async fn delete_tour(&self, _id: i64) -> Result<(), RepoError> {
        Ok(())
    }
}

struct FakeReviews {
    reviews: Mutex<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for FakeReviews {
    async fn find_for_user(
        &self,
        tour_id: i64,
        user_id: i64,
    ) -> Result<Option<Review>, RepoError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.tour_id == tour_id && r.user_id == user_id)
            .cloned())
    }

    async fn find_owned(&self, review_id: i64, user_id: i64) -> Result<Option<Review>, RepoError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == review_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_for_tour(&self, tour_id: i64) -> Result<Vec<ReviewWithAuthor>, RepoError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.tour_id == tour_id)
            .map(|r| ReviewWithAuthor {
                review: r.clone(),
                user_name: Some("Гость".to_string()),
            })
            .collect())
    }

    async fn create(
        &self,
        tour_id: i64,
        user_id: i64,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<(), RepoError> {
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.len() as i64 + 1;
        reviews.push(Review {
            id,
            tour_id,
            user_id,
            rating,
            comment: comment.map(str::to_string),
            created_at: None,
            updated_at: None,
        });
        Ok(())
    }

    async fn update(
        &self,
        _review_id: i64,
        _rating: i32,
        _comment: Option<&str>,
    ) -> Result<(), RepoError> {
        Ok(())
    }

    async fn delete(&self, _review_id: i64) -> Result<(), RepoError> {
        Ok(())
    }
}

struct FakeBookings;

#[async_trait]
impl BookingRepository for FakeBookings {
    async fn create_booking(&self, _booking: &NewBooking) -> Result<Option<i64>, RepoError> {
        Ok(Some(1))
    }
}

fn sample_tour() -> (Tour, String) {
    (
        Tour {
            id: 1,
            city_id: 1,
            title: "Обзорная экскурсия".to_string(),
            description: Some("Короткое описание".to_string()),
            full_description: None,
            price: 4000,
            duration_days: 2,
            available_seats: 10,
            image_url: None,
            created_at: None,
        },
        "Суздаль".to_string(),
    )
}

fn existing_review(id: i64, tour_id: i64, user_id: i64) -> Review {
    Review {
        id,
        tour_id,
        user_id,
        rating: 5,
        comment: Some("Отличный тур".to_string()),
        created_at: None,
        updated_at: None,
    }
}

fn seeded_user(email: &str) -> User {
    User {
        id: 1,
        full_name: "Анна Сидорова".to_string(),
        email: email.to_string(),
        phone: "+79000000000".to_string(),
        passport: "1234 567890".to_string(),
        password: "$2b$12$already.hashed".to_string(),
    }
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        secret: TEST_SECRET.to_string(),
        expiration: 86400,
    }
}

fn test_state(users: Vec<User>, reviews: Vec<Review>) -> AppState {
    let users: Arc<dyn UserRepository> = Arc::new(FakeUsers {
        users: Mutex::new(users),
    });
    let admins: Arc<dyn AdminRepository> = Arc::new(FakeAdmins);
    let catalog: Arc<dyn CatalogRepository> = Arc::new(FakeCatalog {
        tours: Mutex::new(vec![sample_tour()]),
    });
    let reviews: Arc<dyn ReviewRepository> = Arc::new(FakeReviews {
        reviews: Mutex::new(reviews),
    });
    let bookings = Arc::new(BookingService::new(catalog.clone(), Arc::new(FakeBookings)));

    AppState {
        users,
        admins,
        catalog,
        reviews,
        bookings,
        auth: auth_config(),
        default_seats: 20,
    }
}

fn user_token(id: i64) -> String {
    security::issue_user_token(id, "user@mail.ru", "Иван Петров", &auth_config()).unwrap()
}

fn admin_token() -> String {
    security::issue_admin_token(1, "admin", &auth_config()).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let state = test_state(vec![seeded_user("taken@mail.ru")], vec![]);

    let response = app(state)
        .oneshot(json_request(
            "POST",
            "/api/register",
            None,
            json!({
                "full_name": "Пётр Иванов",
                "email": "taken@mail.ru",
                "phone": "+79001112233",
                "passport": "4321 098765",
                "password": "secret"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Пользователь с таким email уже существует");
}

#[tokio::test]
async fn test_second_review_for_same_tour_rejected() {
    let state = test_state(vec![], vec![existing_review(3, 1, 7)]);
    let token = user_token(7);

    let response = app(state)
        .oneshot(json_request(
            "POST",
            "/api/tours/1/reviews",
            Some(&token),
            json!({ "rating": 4, "comment": "Ещё раз" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Вы уже оставили отзыв для этого тура");
}

#[tokio::test]
async fn test_review_update_requires_ownership() {
    // Review 3 belongs to user 2; user 7 tries to edit it.
    let state = test_state(vec![], vec![existing_review(3, 1, 2)]);
    let token = user_token(7);

    let response = app(state)
        .oneshot(json_request(
            "PUT",
            "/api/tours/1/reviews/3",
            Some(&token),
            json!({ "rating": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Недостаточно прав для редактирования этого отзыва"
    );
}

#[tokio::test]
async fn test_review_delete_requires_ownership() {
    let state = test_state(vec![], vec![existing_review(3, 1, 2)]);
    let token = user_token(7);

    let response = app(state)
        .oneshot(json_request(
            "DELETE",
            "/api/tours/1/reviews/3",
            Some(&token),
            json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Недостаточно прав для удаления этого отзыва");
}

#[tokio::test]
async fn test_owner_can_update_own_review() {
    let state = test_state(vec![], vec![existing_review(3, 1, 7)]);
    let token = user_token(7);

    let response = app(state)
        .oneshot(json_request(
            "PUT",
            "/api/tours/1/reviews/3",
            Some(&token),
            json!({ "rating": 3, "comment": "Передумал" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Отзыв обновлен");
}

#[tokio::test]
async fn test_admin_listing_carries_city_name() {
    let state = test_state(vec![], vec![]);
    let token = admin_token();

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/api/admin/tours")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["title"], "Обзорная экскурсия");
    assert_eq!(body[0]["city_name"], "Суздаль");
}

#[tokio::test]
async fn test_tour_update_requires_seat_count() {
    let state = test_state(vec![], vec![]);
    let token = admin_token();

    let response = app(state)
        .oneshot(json_request(
            "PUT",
            "/api/admin/tours/1",
            Some(&token),
            json!({
                "city_id": 1,
                "title": "Обзорная экскурсия",
                "price": 4000,
                "duration_days": 2
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Укажите количество мест");
}
