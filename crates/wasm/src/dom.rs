use natter_chat::{ChatSurfaces, IdentityView};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlImageElement, HtmlInputElement, HtmlTextAreaElement,
};

pub const APP_CONTAINER: &str = "app-container";
pub const CHAT_TOGGLE: &str = "chat-toggle";
pub const USER_INFO_DISPLAY: &str = "user-info-display";
pub const USER_INFO_CHANGE: &str = "user-info-change";
pub const USERNAME_DISPLAY: &str = "username-display";
pub const USERNAME_AVATAR: &str = "username-avatar";
pub const MESSAGE_AUTHOR: &str = "self-message-author";
pub const MESSAGE_WARNING: &str = "message-form-warning";
pub const USERNAME_INPUT: &str = "username-change-input";
pub const UPDATE_USERNAME_BUTTON: &str = "button-update-username";
pub const CANCEL_USERNAME_BUTTON: &str = "button-cancel-change";
pub const SUBMIT_MESSAGE_BUTTON: &str = "button-submit-message";
pub const MESSAGE_INPUT: &str = "message-body-form";

const HIDDEN_CHAT_CLASS: &str = "no-chat";
const KEYBOARD_FOCUS_CLASS: &str = "android-message-focus";

pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{id} not found")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has an unexpected type")))
}

/// The widget's DOM elements, looked up once at startup.
pub struct DomSurfaces {
    document: Document,
    app_container: Element,
    user_info_display: HtmlElement,
    user_info_change: HtmlElement,
    username_display: HtmlElement,
    username_avatar: HtmlImageElement,
    message_author: HtmlInputElement,
    warning: HtmlElement,
    username_input: HtmlInputElement,
    composer: HtmlTextAreaElement,
}

impl DomSurfaces {
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            app_container: element_by_id(document, APP_CONTAINER)?,
            user_info_display: element_by_id(document, USER_INFO_DISPLAY)?,
            user_info_change: element_by_id(document, USER_INFO_CHANGE)?,
            username_display: element_by_id(document, USERNAME_DISPLAY)?,
            username_avatar: element_by_id(document, USERNAME_AVATAR)?,
            message_author: element_by_id(document, MESSAGE_AUTHOR)?,
            warning: element_by_id(document, MESSAGE_WARNING)?,
            username_input: element_by_id(document, USERNAME_INPUT)?,
            composer: element_by_id(document, MESSAGE_INPUT)?,
        })
    }

    fn set_display(element: &HtmlElement, visible: bool) {
        let value = if visible { "flex" } else { "none" };
        if let Err(error) = element.style().set_property("display", value) {
            log::warn!("failed to set display: {:?}", error);
        }
    }

    fn toggle_container_class(&self, class: &str, force: bool) {
        if let Err(error) = self.app_container.class_list().toggle_with_force(class, force) {
            log::warn!("failed to toggle class {}: {:?}", class, error);
        }
    }

    /// Publishes `--vh` so CSS can size around the on-screen keyboard.
    fn refresh_viewport_height(&self) {
        let inner_height = web_sys::window()
            .and_then(|window| window.inner_height().ok())
            .and_then(|height| height.as_f64());
        let (Some(inner_height), Some(root)) = (
            inner_height,
            self.document
                .document_element()
                .and_then(|root| root.dyn_into::<HtmlElement>().ok()),
        ) else {
            return;
        };

        let vh = format!("{}px", inner_height * 0.01);
        if let Err(error) = root.style().set_property("--vh", &vh) {
            log::warn!("failed to set --vh: {:?}", error);
        }
    }
}

impl ChatSurfaces for DomSurfaces {
    fn set_username_label(&mut self, username: &str) {
        self.username_display.set_inner_text(username);
    }

    fn set_username_input(&mut self, username: &str) {
        self.username_input.set_value(username);
    }

    fn username_input(&self) -> String {
        self.username_input.value()
    }

    fn set_message_author(&mut self, username: &str) {
        self.message_author.set_value(username);
    }

    fn set_avatar(&mut self, avatar_url: &str) {
        self.username_avatar.set_src(avatar_url);
    }

    fn show_identity_view(&mut self, view: IdentityView) {
        let editing = view == IdentityView::Editing;
        Self::set_display(&self.user_info_display, !editing);
        Self::set_display(&self.user_info_change, editing);
    }

    fn set_chat_visible(&mut self, visible: bool) {
        self.toggle_container_class(HIDDEN_CHAT_CLASS, !visible);
    }

    fn composer_value(&self) -> String {
        self.composer.value()
    }

    fn set_composer_value(&mut self, value: &str) {
        self.composer.set_value(value);
    }

    fn set_warning(&mut self, text: &str) {
        self.warning.set_inner_text(text);
    }

    fn set_keyboard_focus(&mut self, focused: bool) {
        self.toggle_container_class(KEYBOARD_FOCUS_CLASS, focused);
        self.refresh_viewport_height();
    }
}
