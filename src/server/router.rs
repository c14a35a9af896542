use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::{categories, companies, products, session, users};
use crate::store::Store;
use crate::uploads::UploadStorage;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub uploads: UploadStorage,
    /// Enforce sell price >= buy price on product creation.
    pub require_margin: bool,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .route("/api/signup", post(users::signup))
        .route("/api/users", post(users::create_user))
        .route("/api/users", get(users::list_users))
        .route("/product", get(products::list_products))
        .route("/product", post(products::create_product))
        .route("/product/{id}", delete(products::delete_product))
        .route("/category", get(categories::list_categories))
        .route("/category", post(categories::create_category))
        .route("/company", get(companies::list_companies))
        .route("/company", post(companies::create_company))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
