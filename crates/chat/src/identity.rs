use natter_storage::KeyValueStore;
use rand::Rng;

use crate::surfaces::ChatSurfaces;
use crate::wire::avatar_url;

const DEFAULT_USERNAME_PREFIX: &str = "User";
const DEFAULT_USERNAME_MAX_SUFFIX: u32 = 42;

/// Which half of the identity widget is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityView {
    #[default]
    Display,
    Editing,
}

/// `User1` ..= `User42`.
pub fn generate_default_username<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix = rng.gen_range(1..=DEFAULT_USERNAME_MAX_SUFFIX);
    format!("{DEFAULT_USERNAME_PREFIX}{suffix}")
}

/// Display name plus the avatar derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    avatar_base_url: String,
    view: IdentityView,
}

impl Identity {
    /// Loads the stored name, or generates a default without persisting it.
    ///
    /// A failed or blank read is treated like an absent key.
    pub fn load<S, R>(store: &S, username_key: &str, avatar_base_url: &str, rng: &mut R) -> Self
    where
        S: KeyValueStore + ?Sized,
        R: Rng + ?Sized,
    {
        let stored = match store.get(username_key) {
            Ok(value) => value
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            Err(error) => {
                tracing::warn!("failed to read username from store: {}", error);
                None
            }
        };

        let username = match stored {
            Some(username) => {
                tracing::debug!(%username, "restored username from store");
                username
            }
            None => {
                let username = generate_default_username(rng);
                tracing::debug!(%username, "generated default username");
                username
            }
        };

        Self {
            username,
            avatar_base_url: avatar_base_url.to_string(),
            view: IdentityView::Display,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn avatar_base_url(&self) -> &str {
        &self.avatar_base_url
    }

    pub fn avatar_url(&self) -> String {
        avatar_url(&self.avatar_base_url, &self.username)
    }

    pub fn view(&self) -> IdentityView {
        self.view
    }

    /// Writes the current name into every surface that shows it.
    pub fn apply<U: ChatSurfaces + ?Sized>(&self, surfaces: &mut U) {
        surfaces.set_username_label(&self.username);
        surfaces.set_username_input(&self.username);
        surfaces.set_message_author(&self.username);
        surfaces.set_avatar(&self.avatar_url());
    }

    pub fn begin_edit<U: ChatSurfaces + ?Sized>(&mut self, surfaces: &mut U) {
        self.view = IdentityView::Editing;
        surfaces.show_identity_view(self.view);
    }

    pub fn cancel_edit<U: ChatSurfaces + ?Sized>(&mut self, surfaces: &mut U) {
        self.view = IdentityView::Display;
        surfaces.show_identity_view(self.view);
    }

    /// Adopts `raw` (trimmed) as the new name unless it is blank, then
    /// returns to the display view either way. Returns whether the name
    /// changed.
    pub fn commit_edit<S, U>(
        &mut self,
        raw: &str,
        store: &S,
        username_key: &str,
        surfaces: &mut U,
    ) -> bool
    where
        S: KeyValueStore + ?Sized,
        U: ChatSurfaces + ?Sized,
    {
        let candidate = raw.trim();
        let renamed = !candidate.is_empty();

        if renamed {
            self.username = candidate.to_string();
            self.apply(surfaces);
            if let Err(error) = store.set(username_key, &self.username) {
                tracing::warn!("failed to persist username: {}", error);
            }
            tracing::info!(username = %self.username, "username changed");
        }

        self.cancel_edit(surfaces);
        renamed
    }
}
