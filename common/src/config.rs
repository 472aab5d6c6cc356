use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::{env, fs};

/// Process-wide settings, read once from the environment (optionally seeded
/// from a dotenv file). Token cadence values are carried as plain seconds
/// here; the issuer validates `refresh < window` when it is constructed.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    /// Acceptance window of a check-in token, in seconds.
    pub checkin_window_seconds: u64,
    /// Cadence at which the display token is superseded, in seconds.
    pub checkin_refresh_seconds: u64,
    /// Hex-encoded HMAC key for token signatures. A random key is generated
    /// at startup when unset (tokens then do not survive a restart).
    pub checkin_secret: Option<String>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(|| {
            let project_name =
                env::var("PROJECT_NAME").unwrap_or_else(|_| "luminar-checkin".into());
            let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".into());
            let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/checkin.log".into());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                fs::create_dir_all(parent).expect("Failed to create log directory");
            }

            let checkin_window_seconds = env::var("CHECKIN_WINDOW_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10);
            let checkin_refresh_seconds = env::var("CHECKIN_REFRESH_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7);
            let checkin_secret = env::var("CHECKIN_SECRET").ok().filter(|s| !s.is_empty());

            Config {
                project_name,
                log_level,
                log_file,
                checkin_window_seconds,
                checkin_refresh_seconds,
                checkin_secret,
            }
        })
    }

    pub fn get() -> &'static Self {
        CONFIG.get().expect("Config not initialized")
    }
}
