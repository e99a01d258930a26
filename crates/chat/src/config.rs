use natter_storage::{DEFAULT_APP_NAME, StoreKeys};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://robohash.org/";
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 500;
pub const DEFAULT_WARN_THRESHOLD: usize = 20;

/// Tunables for one chat session controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Namespace for persisted keys (`<app_name>_username`, `<app_name>_chat`).
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    #[serde(default = "default_warn_threshold")]
    pub warn_threshold: usize,
    /// Track composer focus so small screens can resize around the soft keyboard.
    #[serde(default)]
    pub compact_viewport: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            avatar_base_url: default_avatar_base_url(),
            max_message_length: default_max_message_length(),
            warn_threshold: default_warn_threshold(),
            compact_viewport: false,
        }
    }
}

impl ChatConfig {
    pub fn normalized(mut self) -> Self {
        self.app_name = match self.app_name.trim() {
            "" => default_app_name(),
            trimmed => trimmed.to_string(),
        };
        self.avatar_base_url = match self.avatar_base_url.trim() {
            "" => default_avatar_base_url(),
            trimmed => trimmed.to_string(),
        };
        if self.max_message_length == 0 {
            self.max_message_length = default_max_message_length();
        }

        self
    }

    pub fn store_keys(&self) -> StoreKeys {
        StoreKeys::for_app(&self.app_name)
    }

    pub fn composer_limits(&self) -> ComposerLimits {
        ComposerLimits {
            max_message_length: self.max_message_length,
            warn_threshold: self.warn_threshold,
        }
    }
}

/// Character budget enforced while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposerLimits {
    pub max_message_length: usize,
    pub warn_threshold: usize,
}

impl Default for ComposerLimits {
    fn default() -> Self {
        ChatConfig::default().composer_limits()
    }
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_avatar_base_url() -> String {
    DEFAULT_AVATAR_BASE_URL.to_string()
}

fn default_max_message_length() -> usize {
    DEFAULT_MAX_MESSAGE_LENGTH
}

fn default_warn_threshold() -> usize {
    DEFAULT_WARN_THRESHOLD
}
