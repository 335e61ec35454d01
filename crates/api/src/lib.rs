//! HTTP API server for the snack ordering system.
//!
//! Exposes the restaurant, stock and order services and their read models
//! over REST, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{OrderService, RestaurantService, StockService};
use event_store::{EventStore, InMemoryEventBus};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::{OrderView, ProjectionProcessor, RestaurantView, StockView};
use saga::OrderSaga;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Event log shared by every service; in-memory or PostgreSQL.
pub type Store = Arc<dyn EventStore>;

pub type Bus = InMemoryEventBus;

pub type Saga = OrderSaga<Arc<StockService<Store, Bus>>, RestaurantView, Store, Bus>;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub restaurants: Arc<RestaurantService<Store, Bus>>,
    pub stock: Arc<StockService<Store, Bus>>,
    pub orders: OrderService<Store, Bus>,
    pub saga: Saga,
    pub restaurant_view: RestaurantView,
    pub order_view: OrderView,
    pub stock_view: StockView,
    pub processor: Arc<ProjectionProcessor<Store, Bus>>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/restaurants",
            post(routes::restaurants::create).get(routes::restaurants::list),
        )
        .route(
            "/restaurants/{id}",
            get(routes::restaurants::get)
                .put(routes::restaurants::update)
                .delete(routes::restaurants::delete),
        )
        .route(
            "/restaurants/{id}/categories",
            post(routes::restaurants::create_category),
        )
        .route(
            "/restaurants/{id}/categories/{category_id}",
            put(routes::restaurants::update_category).delete(routes::restaurants::delete_category),
        )
        .route(
            "/restaurants/{id}/categories/{category_id}/items",
            post(routes::restaurants::create_item),
        )
        .route(
            "/restaurants/{id}/categories/{category_id}/items/{item_id}",
            put(routes::restaurants::update_item).delete(routes::restaurants::delete_item),
        )
        .route("/stock", get(routes::stock::list))
        .route("/stock/{item_id}", get(routes::stock::get))
        .route("/stock/{item_id}/increase", post(routes::stock::increase))
        .route("/stock/{item_id}/decrease", post(routes::stock::decrease))
        .route(
            "/orders",
            post(routes::orders::create).get(routes::orders::list),
        )
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", put(routes::orders::update_status))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires services, views and the projection processor over one store and bus.
///
/// The processor is registered but not started; call
/// [`ProjectionProcessor::start`] before serving.
pub fn create_state(store: Store, config: &Config) -> Arc<AppState> {
    let bus = InMemoryEventBus::with_capacity(config.bus_capacity);

    let restaurants = Arc::new(RestaurantService::new(store.clone(), bus.clone()));
    let stock = Arc::new(StockService::new(store.clone(), bus.clone()));

    let restaurant_view = RestaurantView::new();
    let order_view = OrderView::new();
    let stock_view = StockView::new();

    let saga = OrderSaga::new(
        Arc::clone(&stock),
        restaurant_view.clone(),
        OrderService::new(store.clone(), bus.clone()),
    )
    .with_deadline(config.saga_timeout);

    let mut processor = ProjectionProcessor::new(store.clone(), bus.clone());
    processor.register(restaurant_view.projection());
    processor.register(order_view.projection());
    processor.register(stock_view.projection());

    Arc::new(AppState {
        restaurants,
        stock,
        orders: OrderService::new(store, bus),
        saga,
        restaurant_view,
        order_view,
        stock_view,
        processor: Arc::new(processor),
    })
}

/// Creates state over an in-memory event log with default settings.
pub fn create_default_state() -> Arc<AppState> {
    create_state(
        Arc::new(event_store::InMemoryEventStore::new()),
        &Config::default(),
    )
}
