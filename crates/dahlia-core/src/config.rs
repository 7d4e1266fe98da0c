//! Signing configuration for the token service

use std::path::Path;

use chrono::Duration;
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ACCESS_SECRET_ENV: &str = "DAHLIA_ACCESS_TOKEN_SECRET";
pub const REFRESH_SECRET_ENV: &str = "DAHLIA_REFRESH_TOKEN_SECRET";
pub const ACCESS_TTL_ENV: &str = "DAHLIA_ACCESS_TOKEN_TTL_MINUTES";

/// Default access token lifetime (20 minutes)
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 20;

/// Generated secrets are kept next to the database under this name
pub const SECRETS_FILE_NAME: &str = "secrets.json";

const MIN_SECRET_LEN: usize = 32;
const GENERATED_SECRET_LEN: usize = 64;

/// Secrets and lifetimes handed to [`crate::auth::TokenService`] at construction
#[derive(Clone)]
pub struct AuthConfig {
    pub access_secret: Vec<u8>,
    pub refresh_secret: Vec<u8>,
    pub access_token_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"****")
            .field("refresh_secret", &"****")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

impl AuthConfig {
    /// Build a config from explicit secrets with the default access token lifetime
    pub fn new(access_secret: impl Into<Vec<u8>>, refresh_secret: impl Into<Vec<u8>>) -> Result<Self> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();

        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(Error::config("signing secrets must not be empty"));
        }
        if access_secret == refresh_secret {
            return Err(Error::config(
                "access and refresh tokens must be signed with different secrets",
            ));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_token_ttl: Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES),
        })
    }

    /// Override the access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Load secrets from the environment.
    ///
    /// A missing secret is replaced by a random one, so tokens won't survive
    /// a restart. Set `DAHLIA_ACCESS_TOKEN_SECRET` and
    /// `DAHLIA_REFRESH_TOKEN_SECRET` in production.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            std::env::var(ACCESS_SECRET_ENV).ok(),
            std::env::var(REFRESH_SECRET_ENV).ok(),
            std::env::var(ACCESS_TTL_ENV).ok(),
        )
    }

    /// Same resolution rules as [`AuthConfig::from_env`], from already-read values
    pub fn from_values(
        access_secret: Option<String>,
        refresh_secret: Option<String>,
        access_ttl_minutes: Option<String>,
    ) -> Result<Self> {
        let access = resolve_secret(ACCESS_SECRET_ENV, access_secret);
        let refresh = resolve_secret(REFRESH_SECRET_ENV, refresh_secret);

        let ttl_minutes = match access_ttl_minutes {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(Error::config(format!(
                        "{} must be a positive number of minutes, got '{}'",
                        ACCESS_TTL_ENV, raw
                    )))
                }
            },
            None => DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        };

        Ok(Self::new(access, refresh)?.with_access_token_ttl(Duration::minutes(ttl_minutes)))
    }

    /// Like [`AuthConfig::from_values`], but a missing secret is taken from
    /// the secrets file at `path`, which is created with fresh random
    /// secrets on first use. Tokens then stay valid across processes that
    /// share the file.
    pub fn from_values_or_file(
        access_secret: Option<String>,
        refresh_secret: Option<String>,
        access_ttl_minutes: Option<String>,
        path: &Path,
    ) -> Result<Self> {
        let mut access_secret = access_secret.filter(|s| !s.is_empty());
        let mut refresh_secret = refresh_secret.filter(|s| !s.is_empty());

        if access_secret.is_none() || refresh_secret.is_none() {
            let stored = StoredSecrets::load_or_create(path)?;
            access_secret = access_secret.or(Some(stored.access_secret));
            refresh_secret = refresh_secret.or(Some(stored.refresh_secret));
        }

        Self::from_values(access_secret, refresh_secret, access_ttl_minutes)
    }
}

/// Signing secrets persisted on disk
#[derive(Debug, Serialize, Deserialize)]
struct StoredSecrets {
    access_secret: String,
    refresh_secret: String,
}

impl StoredSecrets {
    fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let secrets: Self = serde_json::from_str(&content)?;
            if secrets.access_secret.is_empty() || secrets.refresh_secret.is_empty() {
                return Err(Error::config(format!(
                    "secrets file {} has an empty secret",
                    path.display()
                )));
            }
            return Ok(secrets);
        }

        let secrets = Self {
            access_secret: random_secret(),
            refresh_secret: random_secret(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(&secrets)?)?;
        restrict_permissions(path)?;

        log::info!("Generated signing secrets at {}", path.display());
        Ok(secrets)
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn resolve_secret(name: &str, value: Option<String>) -> Vec<u8> {
    match value {
        Some(secret) if secret.len() >= MIN_SECRET_LEN => secret.into_bytes(),
        Some(secret) if !secret.is_empty() => {
            log::warn!(
                "{} is shorter than {} characters. Consider using a longer secret.",
                name,
                MIN_SECRET_LEN
            );
            secret.into_bytes()
        }
        _ => {
            log::warn!(
                "{} not set. Generating random secret. Tokens won't persist across restarts.",
                name
            );
            let mut rng = rand::thread_rng();
            (0..GENERATED_SECRET_LEN).map(|_| rng.gen::<u8>()).collect()
        }
    }
}
