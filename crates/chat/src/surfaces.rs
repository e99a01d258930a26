use crate::identity::IdentityView;

/// UI surfaces the controller reads and writes.
///
/// Hosts inject an implementation instead of the controller looking elements
/// up itself, so the controller runs the same against a DOM, a terminal, or a
/// recording fake.
pub trait ChatSurfaces {
    /// Visible username label.
    fn set_username_label(&mut self, username: &str);
    /// Editable field inside the rename form.
    fn set_username_input(&mut self, username: &str);
    fn username_input(&self) -> String;
    /// Hidden author field attached to the message form.
    fn set_message_author(&mut self, username: &str);
    fn set_avatar(&mut self, avatar_url: &str);
    fn show_identity_view(&mut self, view: IdentityView);

    fn set_chat_visible(&mut self, visible: bool);

    fn composer_value(&self) -> String;
    fn set_composer_value(&mut self, value: &str);
    /// Warning line under the composer; an empty string clears it.
    fn set_warning(&mut self, text: &str);

    fn set_keyboard_focus(&mut self, focused: bool);
}
