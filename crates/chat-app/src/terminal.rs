use natter_chat::{
    ChatEvent, ChatSessionController, ChatSurfaces, IdGenerator, IdentityView, KeyCode,
    SubmitOutcome, Transport,
};
use natter_storage::KeyValueStore;

/// One line of terminal input, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    ToggleChat,
    Rename(String),
    /// Text to type into the composer. `soft_break` ends the line with
    /// Shift+Enter instead of Enter.
    Compose { text: String, soft_break: bool },
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        match trimmed.trim() {
            "/quit" | "/exit" => return Self::Quit,
            "/help" => return Self::Help,
            "/toggle" => return Self::ToggleChat,
            _ => {}
        }

        if let Some(rest) = trimmed.trim_start().strip_prefix("/name") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return Self::Rename(rest.to_string());
            }
        }

        match trimmed.strip_suffix('\\') {
            Some(text) => Self::Compose {
                text: text.to_string(),
                soft_break: true,
            },
            None => Self::Compose {
                text: trimmed.to_string(),
                soft_break: false,
            },
        }
    }
}

pub const HELP_TEXT: &str = "\
type a message and press enter to send it
end a line with \\ to continue the message on the next line
/name <new name>  change your display name
/toggle           show or hide the chat panel
/quit             leave";

/// Terminal stand-in for the widget's DOM.
///
/// Changes worth telling the user about are queued as notices and printed by
/// the input loop.
#[derive(Debug, Default)]
pub struct TerminalSurfaces {
    username_label: String,
    username_input: String,
    composer: String,
    warning: String,
    chat_visible: Option<bool>,
    notices: Vec<String>,
}

impl TerminalSurfaces {
    pub fn composer(&self) -> &str {
        &self.composer
    }

    pub fn push_composer_char(&mut self, character: char) {
        self.composer.push(character);
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl ChatSurfaces for TerminalSurfaces {
    fn set_username_label(&mut self, username: &str) {
        if self.username_label != username {
            self.notices.push(format!("you are chatting as {username}"));
        }
        self.username_label = username.to_string();
    }

    fn set_username_input(&mut self, username: &str) {
        self.username_input = username.to_string();
    }

    fn username_input(&self) -> String {
        self.username_input.clone()
    }

    fn set_message_author(&mut self, _username: &str) {}

    fn set_avatar(&mut self, avatar_url: &str) {
        tracing::debug!(%avatar_url, "avatar updated");
    }

    fn show_identity_view(&mut self, view: IdentityView) {
        tracing::trace!(?view, "identity view");
    }

    fn set_chat_visible(&mut self, visible: bool) {
        if self.chat_visible.is_some_and(|current| current != visible) {
            let state = if visible { "shown" } else { "hidden" };
            self.notices.push(format!("chat panel {state}"));
        }
        self.chat_visible = Some(visible);
    }

    fn composer_value(&self) -> String {
        self.composer.clone()
    }

    fn set_composer_value(&mut self, value: &str) {
        self.composer = value.to_string();
    }

    fn set_warning(&mut self, text: &str) {
        if !text.is_empty() && self.warning != text {
            self.notices.push(text.to_string());
        }
        self.warning = text.to_string();
    }

    fn set_keyboard_focus(&mut self, _focused: bool) {}
}

/// Replays `text` as keystrokes, keeping only characters the composer lets
/// through, then presses Enter (or Shift+Enter for a soft break).
pub fn type_line<S, T, G>(
    controller: &mut ChatSessionController<S, T, TerminalSurfaces, G>,
    text: &str,
    soft_break: bool,
) -> Option<SubmitOutcome>
where
    S: KeyValueStore,
    T: Transport,
    G: IdGenerator,
{
    for character in text.chars() {
        let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::for_char(character)));
        if !response.prevent_default {
            controller.surfaces_mut().push_composer_char(character);
        }
    }

    if soft_break {
        controller.handle(ChatEvent::ComposerKeyDown(KeyCode::SHIFT));
    }
    let response = controller.handle(ChatEvent::ComposerKeyDown(KeyCode::ENTER));
    if !response.prevent_default {
        controller.surfaces_mut().push_composer_char('\n');
    }
    response.submitted
}

/// Opens the rename form, fills it, and presses Enter in it.
pub fn rename<S, T, G>(controller: &mut ChatSessionController<S, T, TerminalSurfaces, G>, raw: &str)
where
    S: KeyValueStore,
    T: Transport,
    G: IdGenerator,
{
    controller.handle(ChatEvent::ShowNameForm);
    controller.surfaces_mut().set_username_input(raw);
    controller.handle(ChatEvent::UsernameKeyDown(KeyCode::ENTER));
}
