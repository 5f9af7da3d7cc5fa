use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Photo endpoints. The router above wraps this module in `auth_middleware`, so a request
/// only reaches these handlers once its bearer token verified and its subject resolved.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /photos  - every photo, insertion order.
        // POST /photos - validate and store a photo owned by the caller.
        .route(
            "/photos",
            get(handlers::list_photos).post(handlers::create_photo),
        )
        // GET /photos/{id}
        // One photo with the owner's public projection embedded.
        .route("/photos/{id}", get(handlers::get_photo))
}
