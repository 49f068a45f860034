//! Sakila API Gateway
//!
//! HTTP surface for the rental API. Handles:
//! - Request routing under `/api`
//! - Extraction and validation of paths, queries and JSON bodies
//! - Observability (logging, metrics, request ids)

pub mod extract;
pub mod handlers;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use sakila_common::{config::AppConfig, db::DbPool, Repository};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DbPool,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DbPool) -> Self {
        Self { config, db }
    }

    /// Repository over the shared pool
    pub fn repo(&self) -> Repository {
        Repository::new(self.db.clone())
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))

        // Catalog endpoints
        .route("/films/top", get(handlers::films::top_films))
        .route("/films/{id}", get(handlers::films::get_film))
        .route("/actors/top", get(handlers::actors::top_actors))
        .route("/actors/{id}/top-films", get(handlers::actors::actor_top_films))
        .route("/search", get(handlers::search::search_films))
        .route("/countries", get(handlers::countries::list_countries))

        // Customer endpoints
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route("/customers/{id}/rentals", get(handlers::rentals::customer_rentals))

        // Rental endpoints
        .route("/rent", post(handlers::rentals::rent_film))
        .route("/rentals/{id}/return", post(handlers::rentals::return_rental));

    // Compose the app
    Router::new()
        .nest("/api", api_routes)
        .layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::NaiveDate;
    use sakila_common::db::models::{City, Country};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use serde_json::{json, Value as Json};
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn app(db: MockDatabase) -> Router {
        let state = AppState::new(
            Arc::new(AppConfig::default()),
            DbPool::from_connection(db.into_connection()),
        );
        create_router(state)
    }

    fn mock() -> MockDatabase {
        MockDatabase::new(DatabaseBackend::MySql)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Json {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn row(pairs: &[(&'static str, Value)]) -> BTreeMap<&'static str, Value> {
        pairs.iter().cloned().collect()
    }

    fn exec(last_insert_id: u64, rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id,
            rows_affected,
        }
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn stamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2006, 2, 15)
            .unwrap()
            .and_hms_opt(4, 44, 0)
            .unwrap()
    }

    fn lethbridge() -> City {
        City {
            city_id: 300,
            city: "Lethbridge".into(),
            country_id: 20,
            last_update: stamp(),
        }
    }

    fn customer_body() -> String {
        json!({
            "first_name": "MARY",
            "last_name": "SMITH",
            "email": "MARY.SMITH@sakilacustomer.org",
            "address": "1913 Hanoi Way",
            "district": "Nagasaki",
            "phone": "28303384290",
            "city_id": 300
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(mock()).oneshot(get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_top_films() {
        let db = mock().append_query_results([vec![row(&[
            ("film_id", Value::from(103u16)),
            ("title", Value::from("BUCKET BROTHERHOOD")),
            ("rentals", Value::from(34i64)),
        ])]]);

        let response = app(db).oneshot(get("/api/films/top")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "film_id": 103, "title": "BUCKET BROTHERHOOD", "rentals": 34 }])
        );
    }

    #[tokio::test]
    async fn test_unknown_film_is_null() {
        let db = mock()
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let response = app(db).oneshot(get("/api/films/9999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "film": null, "actors": [] }));
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let response = app(mock()).oneshot(get("/api/films/abc")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_missing_customer_is_not_found() {
        let db = mock().append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let response = app(db).oneshot(get("/api/customers/4242")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "CUSTOMER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bad_paging_is_rejected() {
        for uri in [
            "/api/customers?page=0",
            "/api/customers?limit=0",
            "/api/customers?limit=101",
            "/api/customers?page=x",
        ] {
            let response = app(mock()).oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_customer_page_echoes_paging() {
        let db = mock().append_query_results([vec![row(&[
            ("customer_id", Value::from(505u16)),
            ("first_name", Value::from("RAFAEL")),
            ("last_name", Value::from("ABNEY")),
            ("email", Value::from("RAFAEL.ABNEY@sakilacustomer.org")),
            ("active", Value::from(true)),
        ])]]);

        let response = app(db)
            .oneshot(get("/api/customers?q=abney&page=2&limit=5"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["page"], 2);
        assert_eq!(body["limit"], 5);
        assert_eq!(body["data"][0]["last_name"], "ABNEY");
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let response = app(mock())
            .oneshot(send_json("POST", "/api/rent", "{\"film_id\": "))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_customer_without_city_is_bad_request() {
        let body = json!({
            "first_name": "MARY",
            "last_name": "SMITH",
            "address": "47 MySakila Drive",
            "district": "Alberta",
            "phone": "555-0100"
        });

        let response = app(mock())
            .oneshot(send_json("POST", "/api/customers", &body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["field"], "city_id");
    }

    #[tokio::test]
    async fn test_rent_conflict() {
        let db = mock().append_query_results([
            vec![row(&[("customer_id", Value::from(1u16))])],
            vec![row(&[("inventory_id", Value::from(9u32))])],
            Vec::new(),
        ]);

        let response = app(db)
            .oneshot(send_json("POST", "/api/rent", r#"{"film_id": 2, "customer_id": 1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["code"], "NO_COPY_AVAILABLE");
    }

    #[tokio::test]
    async fn test_rent_created() {
        let db = mock()
            .append_query_results([
                vec![row(&[("customer_id", Value::from(1u16))])],
                vec![row(&[("inventory_id", Value::from(10u32))])],
                vec![row(&[("inventory_id", Value::from(10u32))])],
            ])
            .append_exec_results([exec(16050, 1)]);

        let response = app(db)
            .oneshot(send_json("POST", "/api/rent", r#"{"film_id": 2, "customer_id": 1}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "rental_id": 16050, "inventory_id": 10 })
        );
    }

    #[tokio::test]
    async fn test_return_unknown_rental() {
        let db = mock().append_exec_results([exec(0, 0)]);

        let response = app(db).oneshot(post("/api/rentals/77/return")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ready_when_database_answers() {
        let response = app(mock().append_exec_results([exec(0, 0)]))
            .oneshot(get("/api/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["checks"]["database"]["status"], "up");
    }

    #[tokio::test]
    async fn test_not_ready_when_database_fails() {
        // No exec result queued, so the ping errors
        let response = app(mock()).oneshot(get("/api/ready")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["checks"]["database"]["error"], "Database unavailable");
    }

    #[tokio::test]
    async fn test_search() {
        let db = mock().append_query_results([vec![row(&[
            ("film_id", Value::from(2u16)),
            ("title", Value::from("ACE GOLDFINGER")),
        ])]]);

        let response = app(db).oneshot(get("/api/search?q=ace")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "film_id": 2, "title": "ACE GOLDFINGER" }])
        );
    }

    #[tokio::test]
    async fn test_search_without_query() {
        let db = mock().append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let response = app(db).oneshot(get("/api/search")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_top_actors() {
        let db = mock().append_query_results([vec![row(&[
            ("actor_id", Value::from(107u16)),
            ("name", Value::from("GINA DEGENERES")),
            ("rentals", Value::from(753i64)),
        ])]]);

        let response = app(db).oneshot(get("/api/actors/top")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "actor_id": 107, "name": "GINA DEGENERES", "rentals": 753 }])
        );
    }

    #[tokio::test]
    async fn test_actor_top_films() {
        let db = mock()
            .append_query_results([vec![row(&[
                ("actor_id", Value::from(1u16)),
                ("first_name", Value::from("PENELOPE")),
                ("last_name", Value::from("GUINESS")),
            ])]])
            .append_query_results([vec![row(&[
                ("film_id", Value::from(499u16)),
                ("title", Value::from("KING EVOLUTION")),
                ("rentals", Value::from(0i64)),
            ])]]);

        let response = app(db).oneshot(get("/api/actors/1/top-films")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "actor": { "actor_id": 1, "first_name": "PENELOPE", "last_name": "GUINESS" },
                "films": [{ "film_id": 499, "title": "KING EVOLUTION", "rentals": 0 }]
            })
        );
    }

    #[tokio::test]
    async fn test_countries() {
        let db = mock().append_query_results([vec![Country {
            country_id: 1,
            country: "Afghanistan".into(),
            last_update: stamp(),
        }]]);

        let response = app(db).oneshot(get("/api/countries")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!([{ "country_id": 1, "country": "Afghanistan" }])
        );
    }

    #[tokio::test]
    async fn test_create_customer() {
        let db = mock()
            .append_query_results([vec![lethbridge()]])
            .append_exec_results([exec(606, 1), exec(600, 1)]);

        let response = app(db)
            .oneshot(send_json("POST", "/api/customers", &customer_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({ "customer_id": 600, "address_id": 606 })
        );
    }

    #[tokio::test]
    async fn test_create_customer_unknown_city() {
        let db = mock().append_query_results([Vec::<City>::new()]);

        let response = app(db)
            .oneshot(send_json("POST", "/api/customers", &customer_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "City not found: 300");
    }

    #[tokio::test]
    async fn test_update_customer() {
        let db = mock()
            .append_query_results([vec![row(&[("address_id", Value::from(5u16))])]])
            .append_query_results([vec![lethbridge()]])
            .append_exec_results([exec(0, 1), exec(0, 1)]);

        let response = app(db)
            .oneshot(send_json("PUT", "/api/customers/1", &customer_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Customer updated" })
        );
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let db = mock().append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let response = app(db)
            .oneshot(send_json("PUT", "/api/customers/4242", &customer_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "CUSTOMER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let db = mock().append_exec_results([exec(0, 3), exec(0, 3), exec(0, 1)]);

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/customers/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Customer deleted" })
        );
    }

    #[tokio::test]
    async fn test_customer_rentals() {
        let at = stamp();
        let rental = |rental_id: i32, returned: bool| {
            row(&[
                ("rental_id", Value::from(rental_id)),
                ("rental_date", Value::from(at)),
                (
                    "return_date",
                    if returned { Value::from(at) } else { Value::ChronoDateTime(None) },
                ),
                ("inventory_id", Value::from(10u32)),
                ("film_id", Value::from(2u16)),
                ("title", Value::from("ACE GOLDFINGER")),
            ])
        };

        let db = mock().append_query_results([vec![rental(2, false), rental(1, true)]]);

        let response = app(db).oneshot(get("/api/customers/1/rentals")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["open"][0]["rental_id"], 2);
        assert_eq!(body["returned"][0]["rental_id"], 1);
        assert_eq!(body["open"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_return_rental() {
        let db = mock().append_exec_results([exec(0, 1)]);

        let response = app(db).oneshot(post("/api/rentals/11496/return")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Rental returned", "rental_id": 11496 })
        );
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let db = mock().append_query_results([Vec::<BTreeMap<&str, Value>>::new()]);

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri("/api/films/top")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }
}
