use std::cell::RefCell;

use uuid::Uuid;

use crate::identity::IdentityView;
use crate::ids::{IdGenerator, MessageId};
use crate::surfaces::ChatSurfaces;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Default)]
pub(crate) struct RecordingSurfaces {
    pub username_label: String,
    pub username_input: String,
    pub message_author: String,
    pub avatar: String,
    pub identity_view: IdentityView,
    pub chat_visible: Option<bool>,
    pub composer: String,
    pub warning: String,
    pub warning_writes: Vec<String>,
    pub keyboard_focus: Option<bool>,
}

impl RecordingSurfaces {
    pub fn with_composer(value: &str) -> Self {
        Self {
            composer: value.to_string(),
            ..Self::default()
        }
    }
}

impl ChatSurfaces for RecordingSurfaces {
    fn set_username_label(&mut self, username: &str) {
        self.username_label = username.to_string();
    }

    fn set_username_input(&mut self, username: &str) {
        self.username_input = username.to_string();
    }

    fn username_input(&self) -> String {
        self.username_input.clone()
    }

    fn set_message_author(&mut self, username: &str) {
        self.message_author = username.to_string();
    }

    fn set_avatar(&mut self, avatar_url: &str) {
        self.avatar = avatar_url.to_string();
    }

    fn show_identity_view(&mut self, view: IdentityView) {
        self.identity_view = view;
    }

    fn set_chat_visible(&mut self, visible: bool) {
        self.chat_visible = Some(visible);
    }

    fn composer_value(&self) -> String {
        self.composer.clone()
    }

    fn set_composer_value(&mut self, value: &str) {
        self.composer = value.to_string();
    }

    fn set_warning(&mut self, text: &str) {
        self.warning = text.to_string();
        self.warning_writes.push(text.to_string());
    }

    fn set_keyboard_focus(&mut self, focused: bool) {
        self.keyboard_focus = Some(focused);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    frames: RefCell<Vec<String>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            frames: RefCell::default(),
            fail: true,
        }
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, frame: &str) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Closed {
                stage: "recording-transport-send",
            });
        }
        self.frames.borrow_mut().push(frame.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct SequentialIds {
    next: u128,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> MessageId {
        self.next += 1;
        MessageId::new(Uuid::from_u128(self.next))
    }
}
