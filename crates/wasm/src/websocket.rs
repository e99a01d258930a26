use natter_chat::{OutboundMessage, Transport, TransportError};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

/// Browser websocket used as the outbound transport.
pub struct WebSocketTransport {
    socket: WebSocket,
}

impl WebSocketTransport {
    pub fn connect(url: &str) -> Result<Self, JsValue> {
        let socket = WebSocket::new(url)?;

        let onopen = Closure::<dyn FnMut()>::new(|| {
            log::info!("chat socket connected");
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();

        // Received chat is rendered by the page; only trace it here.
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(|event: MessageEvent| {
            if let Some(text) = event.data().as_string() {
                match OutboundMessage::from_json(&text) {
                    Ok(message) => {
                        log::debug!("inbound {:?} frame from {}", message.kind, message.author)
                    }
                    Err(error) => log::debug!("unrecognized inbound frame: {}", error),
                }
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();

        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(|event: CloseEvent| {
            log::info!(
                "chat socket closed: code={} reason={}",
                event.code(),
                event.reason()
            );
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();

        Ok(Self { socket })
    }
}

impl Transport for WebSocketTransport {
    fn send(&self, frame: &str) -> Result<(), TransportError> {
        if self.socket.ready_state() != WebSocket::OPEN {
            return Err(TransportError::Closed {
                stage: "websocket-send-not-open",
            });
        }

        self.socket
            .send_with_str(frame)
            .map_err(|error| TransportError::Rejected {
                stage: "websocket-send",
                details: format!("{error:?}"),
            })
    }
}
