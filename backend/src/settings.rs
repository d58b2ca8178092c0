//! Runtime configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `GAMES_*` environment variables and an
//! optional configuration file. Session key handling lives here too so the
//! release-mode checks can be tested without starting a server.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use actix_web::cookie::Key;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ASSET_ROOT: &str = "uploads";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to an ephemeral session key.
    Debug,
    /// Release builds require a readable key of at least 64 bytes.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("GAMES_ALLOW_EPHEMERAL_SESSION_KEY must be false in release builds")]
    EphemeralNotAllowed,
}

/// Configuration values for the games backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GAMES")]
pub struct GamesSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Fixture ports are served when absent.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Pool checkout timeout in seconds.
    pub db_connection_timeout_secs: Option<u64>,
    /// Directory that uploaded images are written beneath.
    pub asset_root: Option<PathBuf>,
    /// File holding the session cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Generate a throwaway key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
}

impl GamesSettings {
    /// Parse the configured bind address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] for an unparsable address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn asset_root(&self) -> PathBuf {
        self.asset_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_ROOT))
    }

    pub fn session_key_path(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Pool settings, or `None` when no database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.db_max_connections.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_connection_timeout(Duration::from_secs(
                    self.db_connection_timeout_secs
                        .unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
                )),
        )
    }

    /// Load the session signing key.
    ///
    /// # Errors
    /// Fails in release builds when the key is missing, short, or an
    /// ephemeral key was requested.
    pub fn session_key(&self, mode: BuildMode) -> Result<Key, SettingsError> {
        if mode == BuildMode::Release && self.allow_ephemeral_session_key {
            return Err(SettingsError::EphemeralNotAllowed);
        }
        load_session_key(
            &self.session_key_path(),
            mode,
            self.allow_ephemeral_session_key,
        )
    }
}

fn load_session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SettingsError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SettingsError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode == BuildMode::Debug || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SettingsError::KeyRead {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        }
    }
}
