use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

pub const DEFAULT_PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/800x500?text=Property+Image";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub session_cookie: Option<String>,
    pub csrf_token: Option<String>,
    pub placeholder_image: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

impl Config {
    pub fn placeholder_image(&self) -> &str {
        self.placeholder_image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

pub fn create_test_config() -> Config {
    Config {
        api_base_url: "http://127.0.0.1:8000/api".to_string(),
        session_cookie: None,
        csrf_token: None,
        placeholder_image: None,
        request_timeout_seconds: None,
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
