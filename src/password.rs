//! One-way password hashing for stored user credentials.

use bcrypt::{DEFAULT_COST, hash, verify};

/// hash_password
///
/// Produces a salted bcrypt hash suitable for the `Users.password` column.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(plain, DEFAULT_COST)
}

/// Same as [`hash_password`] with an explicit work factor (4..=31).
pub fn hash_password_with_cost(plain: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(plain, cost)
}

/// verify_password
///
/// Checks a plaintext candidate against a stored hash. A hash that cannot be parsed
/// is reported as an error, not as a mismatch.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(plain, hashed)
}
