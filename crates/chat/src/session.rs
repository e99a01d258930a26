use crate::composer::{Composer, ComposerState};
use crate::identity::{Identity, IdentityView};
use crate::visibility::Visibility;

/// Per-controller state that lives until the page (or process) goes away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub visibility: Visibility,
    pub composer: Composer,
}

impl Session {
    pub fn username(&self) -> &str {
        self.identity.username()
    }

    pub fn identity_view(&self) -> IdentityView {
        self.identity.view()
    }

    pub fn chat_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn composer_state(&self) -> ComposerState {
        self.composer.state()
    }
}
