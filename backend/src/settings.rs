//! Server configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `FILMKRITIKEN_*` environment variables and
//! config files. Unset values fall back to the defaults below.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::HttpSettings;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_IMAGE_CACHE_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;
const DEFAULT_MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;
const DEFAULT_LIST_LIMIT: u32 = 10;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Configuration values for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FILMKRITIKEN")]
pub struct ServerSettings {
    /// Address to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Deadline for a single service call, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// `max-age` for image responses, in seconds.
    pub image_cache_max_age_secs: Option<u64>,
    /// Largest accepted JSON body, in bytes.
    pub max_payload_bytes: Option<usize>,
    /// Page size for listings without an explicit `limit`.
    pub default_list_limit: Option<u32>,
    /// PostgreSQL connection URI. Without it reviews live in memory only.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Largest accepted JSON body, in bytes.
    #[must_use]
    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes.unwrap_or(DEFAULT_MAX_PAYLOAD_BYTES)
    }

    /// PostgreSQL connection URI, when durable storage is configured.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Upper bound on pooled database connections.
    #[must_use]
    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS)
    }

    /// Handler tunables derived from these settings.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            image_cache_max_age_secs: self
                .image_cache_max_age_secs
                .unwrap_or(DEFAULT_IMAGE_CACHE_MAX_AGE_SECS),
            default_list_limit: self.default_list_limit.unwrap_or(DEFAULT_LIST_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    const VARS: [&str; 8] = [
        "FILMKRITIKEN_HOST",
        "FILMKRITIKEN_PORT",
        "FILMKRITIKEN_REQUEST_TIMEOUT_SECS",
        "FILMKRITIKEN_IMAGE_CACHE_MAX_AGE_SECS",
        "FILMKRITIKEN_MAX_PAYLOAD_BYTES",
        "FILMKRITIKEN_DEFAULT_LIST_LIMIT",
        "FILMKRITIKEN_DATABASE_URL",
        "FILMKRITIKEN_DATABASE_MAX_CONNECTIONS",
    ];

    fn load_from_empty_args_with_clean_env() -> ServerSettings {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        load_from_empty_args()
    }

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("filmkritiken")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(settings.max_payload_bytes(), 8 * 1024 * 1024);
        assert_eq!(settings.http_settings(), HttpSettings::default());
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.database_max_connections(), 10);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FILMKRITIKEN_HOST", Some("127.0.0.1".to_owned())),
            ("FILMKRITIKEN_PORT", Some("9090".to_owned())),
            ("FILMKRITIKEN_REQUEST_TIMEOUT_SECS", Some("3".to_owned())),
            ("FILMKRITIKEN_IMAGE_CACHE_MAX_AGE_SECS", Some("60".to_owned())),
            ("FILMKRITIKEN_MAX_PAYLOAD_BYTES", Some("2048".to_owned())),
            ("FILMKRITIKEN_DEFAULT_LIST_LIMIT", Some("25".to_owned())),
            (
                "FILMKRITIKEN_DATABASE_URL",
                Some("postgres://films@db/filmkritiken".to_owned()),
            ),
            ("FILMKRITIKEN_DATABASE_MAX_CONNECTIONS", Some("4".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr(), SocketAddr::from(([127, 0, 0, 1], 9090)));
        assert_eq!(settings.max_payload_bytes(), 2048);
        assert_eq!(
            settings.http_settings(),
            HttpSettings {
                request_timeout: Duration::from_secs(3),
                image_cache_max_age_secs: 60,
                default_list_limit: 25,
            }
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://films@db/filmkritiken")
        );
        assert_eq!(settings.database_max_connections(), 4);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" postgres://db/films "), Some("postgres://db/films"))]
    fn blank_database_urls_mean_in_memory(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = ServerSettings {
            database_url: raw.map(str::to_owned),
            ..load_from_empty_args_with_clean_env()
        };
        assert_eq!(settings.database_url(), expected);
    }
}
