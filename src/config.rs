//! Runtime configuration, read from the environment (and `.env` if present).

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 3019;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_SESSION_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct Config {
    /// The Postgres connection string
    pub database_url: String,
    /// The port the HTTP server listens on
    pub port: u16,
    /// Where proof documents and profile pictures are written
    pub upload_dir: PathBuf,
    /// How long a login token stays valid
    pub session_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").context("`DATABASE_URL` not set")?;
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));
        let session_hours = parse_var("SESSION_HOURS", DEFAULT_SESSION_HOURS)?;

        Ok(Self {
            database_url,
            port,
            upload_dir,
            session_hours,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("`{}` has an invalid value: {}", name, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_var;

    #[test]
    fn unset_variables_use_the_default() {
        let port: u16 = parse_var("AICTE_PORTAL_TEST_UNSET_PORT", 3019).unwrap();
        assert_eq!(port, 3019);
    }
}
