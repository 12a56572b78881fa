//! Router assembly.

use crate::handlers::{auth, health_check, reservations, venues};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete router.
///
/// Health check at `/health`; everything else under `/api/v1`. Requests are
/// traced, tagged with a correlation ID and answered with permissive CORS.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Venues
        .route(
            "/venues",
            get(venues::list_venues).post(venues::create_venue),
        )
        .route(
            "/venues/:id",
            get(venues::get_venue)
                .put(venues::update_venue)
                .delete(venues::delete_venue),
        )
        .route(
            "/venues/:id/reservations",
            get(reservations::list_venue_reservations).post(reservations::create_reservation),
        )
        // Reservations
        .route("/reservations", get(reservations::list_reservations))
        .route(
            "/reservations/:id",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
        .with_state(state)
}
