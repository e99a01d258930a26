#![deny(unsafe_code)]

//! Chat session controller for the natter live-chat widget.
//!
//! The controller keeps the local identity and panel visibility in a
//! [`natter_storage::KeyValueStore`], interprets composer keystrokes, and
//! hands finished messages to a [`Transport`]. Hosts supply every UI surface
//! through [`ChatSurfaces`].
pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
/// Event contracts between a host and the controller.
pub mod event;
pub mod identity;
pub mod ids;
pub mod outbound;
pub mod session;
pub mod surfaces;
pub mod transport;
pub mod visibility;
/// Socket frame format.
pub mod wire;

#[cfg(test)]
mod test_support;

pub use composer::{ComposerAction, ComposerState, KeyCode, KeyDecision, WarningUpdate};
pub use config::{
    ChatConfig, ComposerLimits, DEFAULT_AVATAR_BASE_URL, DEFAULT_MAX_MESSAGE_LENGTH,
    DEFAULT_WARN_THRESHOLD,
};
pub use controller::ChatSessionController;
pub use error::{ChatError, ChatResult};
pub use event::{ChatEvent, EventResponse};
pub use identity::{Identity, IdentityView, generate_default_username};
pub use ids::{IdGenerator, MessageId, RandomIdGenerator};
pub use outbound::{OutboundPipeline, SEND_FAILED_WARNING, SubmitOutcome};
pub use session::Session;
pub use surfaces::ChatSurfaces;
pub use transport::{Transport, TransportError};
pub use visibility::Visibility;
pub use wire::{OutboundMessage, SocketMessageType, avatar_url};
