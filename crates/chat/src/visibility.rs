use natter_storage::KeyValueStore;

use crate::surfaces::ChatSurfaces;

const VISIBLE_FLAG: &str = "true";

/// Whether the chat panel is shown.
///
/// Persistence is asymmetric: a visible panel is recorded, a hidden panel is
/// represented by the key being absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    visible: bool,
}

impl Visibility {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Self {
        let visible = match store.get(key) {
            Ok(value) => value.as_deref().is_some_and(is_truthy_flag),
            Err(error) => {
                tracing::warn!("failed to read chat visibility from store: {}", error);
                false
            }
        };

        Self { visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn apply<U: ChatSurfaces + ?Sized>(&self, surfaces: &mut U) {
        surfaces.set_chat_visible(self.visible);
    }

    /// Flips the panel and returns the new state.
    pub fn toggle<S, U>(&mut self, store: &S, key: &str, surfaces: &mut U) -> bool
    where
        S: KeyValueStore + ?Sized,
        U: ChatSurfaces + ?Sized,
    {
        self.visible = !self.visible;

        let persisted = if self.visible {
            store.set(key, VISIBLE_FLAG)
        } else {
            store.clear(key)
        };
        if let Err(error) = persisted {
            tracing::warn!("failed to persist chat visibility: {}", error);
        }

        tracing::debug!(visible = self.visible, "chat visibility toggled");
        self.apply(surfaces);
        self.visible
    }
}

fn is_truthy_flag(raw: &str) -> bool {
    let raw = raw.trim();
    !raw.is_empty() && !raw.eq_ignore_ascii_case("false")
}
