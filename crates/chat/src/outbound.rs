use snafu::ResultExt;

use crate::error::{ChatError, ChatResult, SendSnafu};
use crate::identity::Identity;
use crate::ids::{IdGenerator, MessageId};
use crate::surfaces::ChatSurfaces;
use crate::transport::Transport;
use crate::wire::OutboundMessage;

/// Warning shown when the transport refuses a frame.
pub const SEND_FAILED_WARNING: &str = "message failed to send";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Blank input; nothing was sent and no field changed.
    Skipped,
    Sent(MessageId),
    /// The frame never left; the composer text is kept for a manual retry.
    Failed(ChatError),
}

impl SubmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}

/// Validates, wraps, serializes and transmits composed messages.
pub struct OutboundPipeline<T, G> {
    transport: T,
    ids: G,
}

impl<T, G> OutboundPipeline<T, G>
where
    T: Transport,
    G: IdGenerator,
{
    pub fn new(transport: T, ids: G) -> Self {
        Self { transport, ids }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the chat frame for `raw`, or `None` when it trims to nothing.
    pub fn prepare(&mut self, raw: &str, identity: &Identity) -> Option<OutboundMessage> {
        let body = raw.trim();
        if body.is_empty() {
            return None;
        }

        Some(OutboundMessage::chat(
            self.ids.next_id(),
            identity.username(),
            body,
            identity.avatar_base_url(),
            None,
        ))
    }

    /// Sends `raw` as a chat message; clears the composer and warning only
    /// once the transport has accepted the frame.
    pub fn submit<U>(&mut self, raw: &str, identity: &Identity, surfaces: &mut U) -> SubmitOutcome
    where
        U: ChatSurfaces + ?Sized,
    {
        let Some(message) = self.prepare(raw, identity) else {
            return SubmitOutcome::Skipped;
        };

        match self.transmit(&message) {
            Ok(()) => {
                tracing::info!(id = %message.id, author = %message.author, "chat message sent");
                surfaces.set_composer_value("");
                surfaces.set_warning("");
                SubmitOutcome::Sent(message.id)
            }
            Err(error) => {
                tracing::warn!("{}", error);
                surfaces.set_warning(SEND_FAILED_WARNING);
                SubmitOutcome::Failed(error)
            }
        }
    }

    fn transmit(&self, message: &OutboundMessage) -> ChatResult<()> {
        let frame = message.to_json()?;
        self.transport.send(&frame).context(SendSnafu {
            stage: "transport-send",
            message_id: message.id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use natter_storage::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::test_support::{RecordingSurfaces, RecordingTransport, SequentialIds};
    use crate::wire::SocketMessageType;

    fn alice() -> Identity {
        let store = MemoryStore::with_entries([("natter_username", "Alice")]);
        Identity::load(
            &store,
            "natter_username",
            "https://robohash.org/",
            &mut StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn blank_input_is_skipped_without_side_effects() {
        let transport = RecordingTransport::default();
        let mut pipeline = OutboundPipeline::new(&transport, SequentialIds::default());
        let mut surfaces = RecordingSurfaces::with_composer("  \n\t ");

        for raw in ["", "   ", "\n\t", "  \n\t "] {
            let outcome = pipeline.submit(raw, &alice(), &mut surfaces);
            assert!(matches!(outcome, SubmitOutcome::Skipped));
        }

        assert!(transport.frames().is_empty());
        assert_eq!(surfaces.composer, "  \n\t ");
        assert!(surfaces.warning_writes.is_empty());
    }

    #[test]
    fn sent_frame_carries_trimmed_body_and_author() {
        let transport = RecordingTransport::default();
        let mut pipeline = OutboundPipeline::new(&transport, SequentialIds::default());
        let mut surfaces = RecordingSurfaces::with_composer("  hi there  ");
        surfaces.warning = "3 chars left".to_string();

        let outcome = pipeline.submit("  hi there  ", &alice(), &mut surfaces);
        assert!(outcome.is_sent());

        let frames = transport.frames();
        assert_eq!(frames.len(), 1);
        let message = OutboundMessage::from_json(&frames[0]).unwrap();
        assert_eq!(message.body, "hi there");
        assert_eq!(message.author, "Alice");
        assert_eq!(message.image, "https://robohash.org/Alice");
        assert_eq!(message.kind, SocketMessageType::Chat);
        assert_eq!(surfaces.composer, "");
        assert_eq!(surfaces.warning, "");
    }

    #[test]
    fn each_submission_gets_a_fresh_id() {
        let transport = RecordingTransport::default();
        let mut pipeline = OutboundPipeline::new(&transport, SequentialIds::default());
        let mut surfaces = RecordingSurfaces::default();

        pipeline.submit("one", &alice(), &mut surfaces);
        pipeline.submit("two", &alice(), &mut surfaces);

        let ids = transport
            .frames()
            .iter()
            .map(|frame| OutboundMessage::from_json(frame).unwrap().id)
            .collect::<Vec<_>>();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn transport_failure_keeps_composer_text() {
        let transport = RecordingTransport::failing();
        let mut pipeline = OutboundPipeline::new(&transport, SequentialIds::default());
        let mut surfaces = RecordingSurfaces::with_composer("hello");

        let outcome = pipeline.submit("hello", &alice(), &mut surfaces);

        assert!(matches!(
            outcome,
            SubmitOutcome::Failed(ChatError::Send { .. })
        ));
        assert_eq!(surfaces.composer, "hello");
        assert_eq!(surfaces.warning, SEND_FAILED_WARNING);
    }
}
