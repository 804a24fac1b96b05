//! Password handling shared by student and mentor accounts.

use async_graphql::Result;

const HASH_COST: u32 = 10;

/// Which kind of account a session belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "account_kind", rename_all = "snake_case")]
pub enum AccountKind {
    Student,
    Mentor,
}

pub fn ensure_passwords_match(password: &str, confirm_password: &str) -> Result<()> {
    if password == confirm_password {
        Ok(())
    } else {
        Err("Passwords do not match".into())
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST)
        .map_err(|err| format!("Failed to hash password: {}", err).into())
}

pub fn password_matches(password: &str, pass_hash: &str) -> Result<bool> {
    bcrypt::verify(password, pass_hash)
        .map_err(|err| format!("Failed to verify password: {}", err).into())
}
