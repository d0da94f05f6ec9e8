use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Redis (seen set + cycle lock)
    pub redis_url: String,

    // Browserless (captures)
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    // Account to watch
    pub host_uid: u64,

    // Cycle timing
    pub poll_interval_ms: u64,
    pub dispatch_delay_ms: u64,

    // Where captured screenshots land
    pub capture_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            redis_url: required_env("REDIS_URL"),
            browserless_url: env::var("BROWSERLESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            host_uid: required_env("WATCH_UID")
                .parse()
                .expect("WATCH_UID must be a number"),
            poll_interval_ms: env::var("POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("POLL_INTERVAL_MS must be a number"),
            dispatch_delay_ms: env::var("DISPATCH_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("DISPATCH_DELAY_MS must be a number"),
            capture_dir: env::var("CAPTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate that touches process env, so no
    // serialization guard is needed.
    #[test]
    fn optional_vars_fall_back_to_documented_defaults() {
        env::set_var("REDIS_URL", "redis://localhost:6379");
        env::set_var("WATCH_UID", "927290");
        for key in [
            "BROWSERLESS_URL",
            "BROWSERLESS_TOKEN",
            "POLL_INTERVAL_MS",
            "DISPATCH_DELAY_MS",
            "CAPTURE_DIR",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env();

        assert_eq!(config.host_uid, 927290);
        assert_eq!(config.poll_interval_ms, 10_000);
        assert_eq!(config.dispatch_delay_ms, 1_000);
        assert_eq!(config.browserless_url, "http://localhost:3000");
        assert_eq!(config.browserless_token, None);
        assert_eq!(config.capture_dir, env::temp_dir());
    }
}
