use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

const URL_VAR: &str = "ELO_CONSOLE_URL";
const TIMEOUT_VAR: &str = "ELO_CONSOLE_TIMEOUT_SECS";
const STORAGE_DIR_VAR: &str = "ELO_CONSOLE_STORAGE_DIR";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            user_agent: "EloConsole/0.1",
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub dir: PathBuf,
    /// Name of the entry holding the bearer token
    pub token_key: &'static str,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".elo_console"),
            token_key: "jwtToken",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            service: ServiceSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    /// Defaults overridden by `ELO_CONSOLE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service.base_url = base_url.into();
        self
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(url) = lookup(URL_VAR) {
            config.service.base_url = url;
        }
        match parse_var::<_, u64>(&lookup, TIMEOUT_VAR) {
            Some(0) => warn!("Ignoring {}=0: timeout must be at least one second", TIMEOUT_VAR),
            Some(timeout) => config.service.timeout_secs = timeout,
            None => {}
        }
        if let Some(dir) = lookup(STORAGE_DIR_VAR) {
            config.storage.dir = PathBuf::from(dir);
        }

        config
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
