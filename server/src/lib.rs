//! HTTP API for managing to-do items.
//!
//! # Overview
//! Routes under `/items` list, create, fetch, replace, toggle and delete
//! items. `/swagger` serves a browsable UI over the generated OpenAPI
//! document.
//!
//! # Design
//! - Handlers share nothing but [`AppState`]: a [`TodoStore`] behind an `Arc`
//!   and a clock.
//! - The clock is injected so the due-date rule can be tested at fixed
//!   instants; production uses [`system_clock`].
//! - CORS is applied by the caller ([`cors_layer`]) so tests can drive the
//!   bare router.

pub mod config;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod model;
pub mod store;
pub mod validation;

use std::{future::Future, sync::Arc};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use error::AppError;
pub use model::{ItemFilter, ListQuery, NewTodoItem, StatusUpdate, TodoItem};
pub use store::{SqliteStore, StoreError, TodoStore};

/// Source of "now" for due-date checks and completion stamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub clock: Clock,
}

impl AppState {
    pub fn new(store: impl TodoStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            clock: system_clock(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/items", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/items/{id}",
            get(handlers::get_item)
                .put(handlers::replace_item)
                .delete(handlers::delete_item),
        )
        .route("/items/status/{id}", put(handlers::toggle_status))
        .route(docs::OPENAPI_JSON_PATH, get(docs::openapi_json))
        .route(docs::SWAGGER_UI_PATH, get(docs::swagger_ui))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Allow browser requests from exactly one origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/'))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
