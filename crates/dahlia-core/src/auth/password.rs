//! Password hashing

use crate::error::Result;

/// bcrypt work factor for stored password hashes
pub const PASSWORD_HASH_COST: u32 = 10;

/// Hash a password
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, PASSWORD_HASH_COST)?)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, hash)?)
}
