use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::validation;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// A row of the `"Users"` table. The `password` column holds a bcrypt hash and is never
/// serialized; responses use [`UserSummary`] instead.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserSummary
///
/// The reduced user projection embedded in photo detail responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Photo
///
/// A row of the `"Photos"` table, serialized with the column names of the public contract
/// (`UserId`, `createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Photo {
    pub id: i32,
    pub title: String,
    pub caption: Option<String>,
    pub image_url: String,

    // FK to "Users".id (Owner).
    #[serde(rename = "UserId")]
    pub user_id: i32,

    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PhotoDetail
///
/// Response of `GET /photos/{id}`: the photo without its raw owner id, with the owner
/// embedded as `User`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PhotoDetail {
    pub id: i32,
    pub title: String,
    pub caption: Option<String>,
    pub image_url: String,
    #[serde(rename = "createdAt")]
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "User")]
    pub user: UserSummary,
}

impl PhotoDetail {
    pub fn new(photo: Photo, owner: UserSummary) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            caption: photo.caption,
            image_url: photo.image_url,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
            user: owner,
        }
    }
}

/// PhotoWithOwnerRow
///
/// Flat row produced by the photo/user JOIN; folded into [`PhotoDetail`].
#[derive(Debug, Clone, FromRow)]
pub struct PhotoWithOwnerRow {
    pub id: i32,
    pub title: String,
    pub caption: Option<String>,
    pub image_url: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_email: String,
}

impl From<PhotoWithOwnerRow> for PhotoDetail {
    fn from(row: PhotoWithOwnerRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            caption: row.caption,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: UserSummary {
                id: row.user_id,
                username: row.owner_username,
                email: row.owner_email,
            },
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// CreatePhotoRequest
///
/// Input payload for POST /photos. Every field is optional at the type level so that a
/// missing field becomes a validation message rather than a deserialization failure.
/// Unknown fields (`id`, `createdAt`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePhotoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Explicit owner. Only honored when owner override is enabled in the configuration.
    #[serde(default, rename = "UserId")]
    pub user_id: Option<i32>,
}

/// NewPhoto
///
/// A validated photo ready for insertion. Only obtainable through [`NewPhoto::build`], so
/// anything handed to the repository has passed every field rule and carries a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub image_url: String,
    pub user_id: i32,
}

impl NewPhoto {
    /// build
    ///
    /// Runs all field rules and fills the default caption. On failure returns every
    /// violated rule message, in rule order.
    pub fn build(req: CreatePhotoRequest, owner_id: i32) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        validation::check_title(req.title.as_deref(), &mut errors);
        validation::check_image_url(req.image_url.as_deref(), &mut errors);

        match (req.title, req.image_url) {
            (Some(title), Some(image_url)) if errors.is_empty() => {
                let caption = match req.caption {
                    Some(caption) if !caption.trim().is_empty() => caption,
                    _ => default_caption(&title, &image_url),
                };
                Ok(Self {
                    title,
                    caption,
                    image_url,
                    user_id: owner_id,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Caption used when the client does not supply one.
pub fn default_caption(title: &str, image_url: &str) -> String {
    format!("{} {}", title.to_uppercase(), image_url)
}

/// NewUser
///
/// Input for account creation. `password_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// LoginRequest
///
/// Input payload for POST /users/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// LoginResponse
///
/// A freshly issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub access_token: String,
}
