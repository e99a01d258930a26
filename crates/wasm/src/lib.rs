//! Browser binding for the natter chat widget.
//!
//! Wires the page's DOM events into a [`ChatSessionController`] backed by
//! `localStorage` and a browser `WebSocket`.
use std::cell::RefCell;
use std::rc::Rc;

use natter_chat::{
    ChatConfig, ChatEvent, ChatSessionController, KeyCode, RandomIdGenerator,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent};

pub mod dom;
pub mod local_storage;
pub mod websocket;

use dom::{DomSurfaces, element_by_id};
use local_storage::LocalStorageStore;
use websocket::WebSocketTransport;

type Controller = ChatSessionController<
    LocalStorageStore,
    WebSocketTransport,
    DomSurfaces,
    RandomIdGenerator<StdRng>,
>;
type SharedController = Rc<RefCell<Controller>>;

/// Initialize WASM module
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("natter widget module initialized");
}

#[wasm_bindgen]
pub struct ChatWidget {
    controller: SharedController,
}

#[wasm_bindgen]
impl ChatWidget {
    /// Connects to `websocket_url` and takes over the widget's elements.
    ///
    /// `config` is an optional object with `ChatConfig` fields.
    #[wasm_bindgen(constructor)]
    pub fn new(websocket_url: &str, config: JsValue) -> Result<ChatWidget, JsValue> {
        let config = parse_config(config)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let controller = ChatSessionController::start(
            config,
            LocalStorageStore::from_window()?,
            WebSocketTransport::connect(websocket_url)?,
            DomSurfaces::from_document(&document)?,
            RandomIdGenerator::new(StdRng::from_entropy()),
            &mut StdRng::from_entropy(),
        );
        let controller = Rc::new(RefCell::new(controller));

        listen(&document, dom::CHAT_TOGGLE, "click", &controller, |_| {
            Some(ChatEvent::ToggleChat)
        })?;
        listen(&document, dom::USER_INFO_DISPLAY, "click", &controller, |_| {
            Some(ChatEvent::ShowNameForm)
        })?;
        listen(&document, dom::UPDATE_USERNAME_BUTTON, "click", &controller, |_| {
            Some(ChatEvent::CommitName)
        })?;
        listen(&document, dom::CANCEL_USERNAME_BUTTON, "click", &controller, |_| {
            Some(ChatEvent::CancelNameForm)
        })?;
        listen(&document, dom::USERNAME_INPUT, "keydown", &controller, |event| {
            key_code(event).map(ChatEvent::UsernameKeyDown)
        })?;
        listen(&document, dom::MESSAGE_INPUT, "keydown", &controller, |event| {
            key_code(event).map(ChatEvent::ComposerKeyDown)
        })?;
        listen(&document, dom::SUBMIT_MESSAGE_BUTTON, "click", &controller, |_| {
            Some(ChatEvent::SubmitClicked)
        })?;
        listen(&document, dom::MESSAGE_INPUT, "focus", &controller, |_| {
            Some(ChatEvent::ComposerFocus)
        })?;
        listen(&document, dom::MESSAGE_INPUT, "blur", &controller, |_| {
            Some(ChatEvent::ComposerBlur)
        })?;

        Ok(ChatWidget { controller })
    }

    #[wasm_bindgen(getter)]
    pub fn username(&self) -> String {
        self.controller.borrow().session().username().to_string()
    }

    #[wasm_bindgen(getter, js_name = chatVisible)]
    pub fn chat_visible(&self) -> bool {
        self.controller.borrow().session().chat_visible()
    }
}

fn parse_config(config: JsValue) -> Result<ChatConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(ChatConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(config)?)
}

#[allow(deprecated)]
fn key_code(event: &Event) -> Option<KeyCode> {
    event
        .dyn_ref::<KeyboardEvent>()
        .map(|event| KeyCode::new(event.key_code()))
}

/// Forwards `kind` events on element `#id` to the controller and applies
/// its `prevent_default` verdict.
fn listen<F>(
    document: &web_sys::Document,
    id: &str,
    kind: &str,
    controller: &SharedController,
    map: F,
) -> Result<(), JsValue>
where
    F: Fn(&Event) -> Option<ChatEvent> + 'static,
{
    let target: EventTarget = element_by_id(document, id)?;
    let controller = Rc::clone(controller);

    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(chat_event) = map(&event) else {
            return;
        };
        let response = match controller.try_borrow_mut() {
            Ok(mut controller) => controller.handle(chat_event),
            Err(_) => {
                log::warn!("dropped re-entrant {:?} event", chat_event);
                return;
            }
        };
        if response.prevent_default {
            event.prevent_default();
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
