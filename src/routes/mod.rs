use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{self, auth, categories, events, participations, photos, users};
use crate::models::photo::MAX_UPLOAD_BYTES;
use crate::state::AppState;

// Headroom over the file limit for the multipart framing and caption.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

pub fn create_routes(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/validate", post(auth::validate));

    let user_routes = Router::new().route("/me", get(users::me).put(users::update_me));

    let users_routes = Router::new().route("/:id", get(users::get_user));

    let category_routes = Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        );

    let event_routes = Router::new()
        .route("/", get(events::list).post(events::create))
        .route("/upcoming", get(events::upcoming))
        .route(
            "/my-participations",
            get(participations::my_participations),
        )
        .route(
            "/:id",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route(
            "/:id/participate",
            post(participations::participate).delete(participations::cancel),
        )
        .route("/:id/participants", get(participations::participants))
        .route(
            "/:id/participation-status",
            get(participations::participation_status),
        );

    let photo_routes = Router::new()
        .route("/upload/:event_id", post(photos::upload))
        .route("/event/:event_id", get(photos::by_event))
        .route("/user/me", get(photos::my_photos))
        .route("/file/:filename", get(photos::file))
        .route("/:id", delete(photos::delete))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/user", user_routes)
        .nest("/api/users", users_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/events", event_routes)
        .nest("/api/photos", photo_routes)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}
