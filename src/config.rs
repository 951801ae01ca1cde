/// Configuration management for lenta
///
/// This module handles loading and managing configuration from environment
/// variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Feed pagination settings
    pub pagination: PaginationConfig,
    /// Page cache settings
    pub cache: CacheConfig,
    /// Media storage settings
    pub media: MediaConfig,
    /// Session and login settings
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Feed pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Posts per feed page
    pub page_size: i64,
    /// Maximum posts considered by the group feed before pagination
    pub group_feed_window: i64,
}

/// Page cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Index page cache expiry in seconds
    pub page_ttl_secs: u64,
}

/// Media storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Root directory for uploaded files; post images land under
    /// `<root>/posts/` and are referenced by that relative path.
    pub root: String,
}

/// Session and login settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_ttl_hours: i64,
    /// Path unauthenticated callers are redirected to
    pub login_path: String,
}

const DEV_JWT_SECRET: &str = "lenta-dev-secret";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("LENTA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("LENTA_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/lenta".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            pagination: PaginationConfig {
                page_size: std::env::var("POSTS_PER_PAGE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                group_feed_window: std::env::var("GROUP_FEED_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                page_ttl_secs: std::env::var("PAGE_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
            },
            media: MediaConfig {
                root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            },
            auth: {
                let jwt_secret =
                    std::env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
                if app_env.eq_ignore_ascii_case("production")
                    && (jwt_secret.trim().is_empty() || jwt_secret == DEV_JWT_SECRET)
                {
                    return Err(
                        "JWT_SECRET must be set to a non-default value in production".to_string()
                    );
                }

                AuthConfig {
                    jwt_secret,
                    token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(24),
                    login_path: std::env::var("LOGIN_PATH")
                        .unwrap_or_else(|_| "/auth/login/".to_string()),
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "LENTA_HOST",
            "LENTA_PORT",
            "CORS_ALLOWED_ORIGINS",
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "POSTS_PER_PAGE",
            "GROUP_FEED_WINDOW",
            "PAGE_CACHE_TTL_SECS",
            "MEDIA_ROOT",
            "JWT_SECRET",
            "TOKEN_TTL_HOURS",
            "LOGIN_PATH",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_environment() {
        clear_env();
        let config = Config::from_env().expect("default config loads");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.pagination.group_feed_window, 10);
        assert_eq!(config.cache.page_ttl_secs, 20);
        assert_eq!(config.media.root, "media");
        assert_eq!(config.auth.login_path, "/auth/login/");
    }

    #[test]
    #[serial]
    fn production_rejects_default_jwt_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://example.com");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_page_size_falls_back_to_default() {
        clear_env();
        std::env::set_var("POSTS_PER_PAGE", "not-a-number");
        let config = Config::from_env().expect("config loads");
        assert_eq!(config.pagination.page_size, 10);
        clear_env();
    }
}
