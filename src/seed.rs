use crate::{
    error::ApiError,
    models::{NewUser, User},
    password,
    repository::RepositoryState,
};

/// A user account to create at startup. The password is plaintext here and hashed on insert.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const DEFAULT_USERS: &[SeedUser] = &[SeedUser {
    username: "papipuu",
    email: "puguh@mail.com",
    password: "mypass",
}];

/// seed_users
///
/// Hashes and inserts each user unless its email already exists. Returns only the users that
/// were actually created, so running it twice is harmless.
pub async fn seed_users(repo: &RepositoryState, users: &[SeedUser]) -> Result<Vec<User>, ApiError> {
    let mut created = Vec::new();

    for seed in users {
        if repo.get_user_by_email(seed.email).await?.is_some() {
            tracing::debug!(email = seed.email, "seed user already present");
            continue;
        }

        let new_user = NewUser {
            username: seed.username.to_string(),
            email: seed.email.to_string(),
            password_hash: password::hash_password(seed.password)?,
        };

        if let Some(user) = repo.create_user(new_user).await? {
            tracing::info!(id = user.id, email = %user.email, "seeded user");
            created.push(user);
        }
    }

    Ok(created)
}

pub async fn seed_default_users(repo: &RepositoryState) -> Result<Vec<User>, ApiError> {
    seed_users(repo, DEFAULT_USERS).await
}
