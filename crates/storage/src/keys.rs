/// Namespace used when no application name is configured.
pub const DEFAULT_APP_NAME: &str = "natter";

const USERNAME_SUFFIX: &str = "username";
const CHAT_VISIBLE_SUFFIX: &str = "chat";

/// Store keys for one application namespace (`<app>_username`, `<app>_chat`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub username: String,
    pub chat_visible: String,
}

impl StoreKeys {
    pub fn for_app(app_name: &str) -> Self {
        let app_name = match app_name.trim() {
            "" => DEFAULT_APP_NAME,
            trimmed => trimmed,
        };

        Self {
            username: format!("{app_name}_{USERNAME_SUFFIX}"),
            chat_visible: format!("{app_name}_{CHAT_VISIBLE_SUFFIX}"),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::for_app(DEFAULT_APP_NAME)
    }
}
