use crate::{
    AppState,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    models::{self, CreatePhotoRequest, LoginRequest, LoginResponse, NewPhoto, Photo, PhotoDetail},
    password,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

/// Message returned when an explicit `UserId` points at no account.
pub const UNKNOWN_OWNER: &str = "UserId does not reference an existing user";

// --- Handlers ---

/// create_photo
///
/// [Authenticated Route] Validates and stores a new photo owned by the caller.
///
/// The owner is the authenticated user unless owner override is enabled in the
/// configuration and the body names a `UserId`. Every violated field rule is reported
/// in a single 400 response.
#[utoipa::path(
    post,
    path = "/photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Created", body = Photo),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized or invalid token")
    )
)]
pub async fn create_photo(
    AuthUser { id: caller_id, .. }: AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<CreatePhotoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<models::Photo>)> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "unreadable photo payload");
        ApiError::Validation(vec![rejection.body_text()])
    })?;

    let requested_owner = payload.user_id;
    let mut new_photo = NewPhoto::build(payload, caller_id).map_err(ApiError::Validation)?;

    if let Some(requested) = requested_owner.filter(|&id| {
        state.config.allow_owner_override && id != caller_id
    }) {
        if state.repo.get_user(requested).await?.is_none() {
            return Err(ApiError::Validation(vec![UNKNOWN_OWNER.to_string()]));
        }
        new_photo.user_id = requested;
    }

    let photo = state.repo.create_photo(new_photo).await?;

    tracing::info!(photo_id = photo.id, owner_id = photo.user_id, "photo created");
    Ok((StatusCode::CREATED, Json(photo)))
}

/// list_photos
///
/// [Authenticated Route] Lists every photo in insertion order.
#[utoipa::path(
    get,
    path = "/photos",
    responses(
        (status = 200, description = "All photos", body = [Photo]),
        (status = 401, description = "Unauthorized or invalid token")
    )
)]
pub async fn list_photos(
    _user: AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<models::Photo>>> {
    let photos = state.repo.list_photos().await?;
    Ok(Json(photos))
}

/// get_photo
///
/// [Authenticated Route] Retrieves one photo with its owner embedded.
/// A non-numeric id cannot match any row and is answered like an unknown one.
#[utoipa::path(
    get,
    path = "/photos/{id}",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Found", body = PhotoDetail),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthorized or invalid token")
    )
)]
pub async fn get_photo(
    _user: AuthUser,
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<models::PhotoDetail>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    state
        .repo
        .get_photo_detail(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// login
///
/// [Public Route] Exchanges an email and password for a bearer token.
/// Unknown emails and wrong passwords produce the same response.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;

    let user = state
        .repo
        .get_user_by_email(&payload.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&payload.password, &user.password)? {
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(LoginResponse { access_token }))
}
