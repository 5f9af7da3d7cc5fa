use crate::models::{NewPhoto, NewUser, Photo, PhotoDetail, PhotoWithOwnerRow, User, UserSummary};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repository Trait
///
/// The persistence contract used by handlers and the `AuthUser` extractor. Handlers only
/// see `Arc<dyn Repository>`, so the Postgres implementation and the in-memory one used in
/// tests are interchangeable.
///
/// Every method reports storage failures as `sqlx::Error`; "not found" is `Ok(None)`.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    // Returns None when the email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error>;

    // --- Photos ---
    // All photos in insertion order.
    async fn list_photos(&self) -> Result<Vec<Photo>, sqlx::Error>;
    // A photo together with its owner's public projection.
    async fn get_photo_detail(&self, id: i32) -> Result<Option<PhotoDetail>, sqlx::Error>;
    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL. Quoted identifiers (`"UserId"`, `"createdAt"`) are
/// aliased to the snake_case names the `FromRow` models expect.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const USER_COLUMNS: &str = r#"id, username, email, password,
    "createdAt" AS created_at, "updatedAt" AS updated_at"#;

const PHOTO_COLUMNS: &str = r#"id, title, caption, image_url, "UserId" AS user_id,
    "createdAt" AS created_at, "updatedAt" AS updated_at"#;

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        let query = format!(r#"SELECT {USER_COLUMNS} FROM "Users" WHERE id = $1"#);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(r#"SELECT {USER_COLUMNS} FROM "Users" WHERE email = $1"#);
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// create_user
    ///
    /// `ON CONFLICT (email) DO NOTHING` makes seeding idempotent; a conflict yields `None`.
    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            r#"INSERT INTO "Users" (username, email, password, "createdAt", "updatedAt")
               VALUES ($1, $2, $3, NOW(), NOW())
               ON CONFLICT (email) DO NOTHING
               RETURNING {USER_COLUMNS}"#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.username)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, sqlx::Error> {
        let query = format!(r#"SELECT {PHOTO_COLUMNS} FROM "Photos" ORDER BY id ASC"#);
        sqlx::query_as::<_, Photo>(&query).fetch_all(&self.pool).await
    }

    async fn get_photo_detail(&self, id: i32) -> Result<Option<PhotoDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, PhotoWithOwnerRow>(
            r#"
            SELECT
                p.id, p.title, p.caption, p.image_url, p."UserId" AS user_id,
                p."createdAt" AS created_at, p."updatedAt" AS updated_at,
                u.username AS owner_username, u.email AS owner_email
            FROM "Photos" p
            JOIN "Users" u ON u.id = p."UserId"
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PhotoDetail::from))
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, sqlx::Error> {
        let query = format!(
            r#"INSERT INTO "Photos" (title, caption, image_url, "UserId", "createdAt", "updatedAt")
               VALUES ($1, $2, $3, $4, NOW(), NOW())
               RETURNING {PHOTO_COLUMNS}"#
        );
        sqlx::query_as::<_, Photo>(&query)
            .bind(photo.title)
            .bind(photo.caption)
            .bind(photo.image_url)
            .bind(photo.user_id)
            .fetch_one(&self.pool)
            .await
    }
}

/// InMemoryRepository
///
/// A `Repository` kept in process memory. Ids are assigned sequentially from 1, like the
/// serial columns of the real schema. Used by tests and for running the API without a
/// database.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    photos: Vec<Photo>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert_photo_unchecked
    ///
    /// Stores a photo row as given. Unlike [`Repository::create_photo`] it does not check
    /// that the owner exists, so it can place rows a foreign key would refuse. Meant for
    /// seeding test fixtures.
    pub async fn insert_photo_unchecked(&self, photo: NewPhoto) -> Photo {
        let mut tables = self.inner.write().await;
        let now = Utc::now();
        let row = Photo {
            id: tables.photos.len() as i32 + 1,
            title: photo.title,
            caption: Some(photo.caption),
            image_url: photo.image_url,
            user_id: photo.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.photos.push(row.clone());
        row
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_user(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let tables = self.inner.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<Option<User>, sqlx::Error> {
        let mut tables = self.inner.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let now = Utc::now();
        let row = User {
            id: tables.users.len() as i32 + 1,
            username: user.username,
            email: user.email,
            password: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(Some(row))
    }

    async fn list_photos(&self) -> Result<Vec<Photo>, sqlx::Error> {
        Ok(self.inner.read().await.photos.clone())
    }

    async fn get_photo_detail(&self, id: i32) -> Result<Option<PhotoDetail>, sqlx::Error> {
        let tables = self.inner.read().await;
        let Some(photo) = tables.photos.iter().find(|p| p.id == id) else {
            return Ok(None);
        };
        // Mirrors the inner JOIN: a photo without an owner row is invisible.
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == photo.user_id)
            .map(|owner| PhotoDetail::new(photo.clone(), UserSummary::from(owner))))
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo, sqlx::Error> {
        let owner_exists = self
            .inner
            .read()
            .await
            .users
            .iter()
            .any(|u| u.id == photo.user_id);
        if !owner_exists {
            // Same outcome as the foreign key on "Photos"."UserId".
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(self.insert_photo_unchecked(photo).await)
    }
}
