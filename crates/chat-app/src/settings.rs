use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use natter_chat::ChatConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080/entry";
pub const SETTINGS_DIRECTORY_NAME: &str = "natter";
pub const SETTINGS_FILE_NAME: &str = "config.json";
pub const STORE_FILE_NAME: &str = "store.json";
pub const ENV_PREFIX: &str = "NATTER_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Where identity and visibility persist; defaults under the data dir.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            store_path: None,
            chat: ChatConfig::default(),
        }
    }
}

impl AppSettings {
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".natter"))
            .join(SETTINGS_FILE_NAME)
    }

    pub fn default_store_path() -> PathBuf {
        dirs::data_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".natter"))
            .join(STORE_FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_config_path())
    }

    /// Defaults, then the JSON file (if any), then `NATTER_*` variables.
    /// Nested keys use `__`, e.g. `NATTER_CHAT__APP_NAME`.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        let figment = Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        match figment.extract::<AppSettings>() {
            Ok(settings) => settings.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. using defaults",
                    path,
                    error
                );
                AppSettings::default()
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(Self::default_store_path)
    }

    pub fn normalized(mut self) -> Self {
        self.server_url = match self.server_url.trim() {
            "" => default_server_url(),
            trimmed => trimmed.to_string(),
        };
        self.store_path = self
            .store_path
            .filter(|path| !path.as_os_str().is_empty());
        self.chat = self.chat.normalized();
        self
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}
