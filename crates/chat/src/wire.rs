use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ChatResult, DecodeFrameSnafu, SerializeFrameSnafu};
use crate::ids::MessageId;

/// Frame discriminator on the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocketMessageType {
    Chat,
    /// Reserved keep-alive frame; the session controller never builds one.
    Ping,
}

/// One chat frame as it travels over the transport.
///
/// Field order matches the serialized JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub author: String,
    pub body: String,
    pub image: String,
    pub id: MessageId,
    #[serde(rename = "type")]
    pub kind: SocketMessageType,
}

impl OutboundMessage {
    /// Builds a chat frame; the avatar defaults to `avatar_base_url + author`.
    pub fn chat(
        id: MessageId,
        author: impl Into<String>,
        body: impl Into<String>,
        avatar_base_url: &str,
        image: Option<String>,
    ) -> Self {
        let author = author.into();
        let image = image
            .filter(|image| !image.trim().is_empty())
            .unwrap_or_else(|| avatar_url(avatar_base_url, &author));

        Self {
            author,
            body: body.into(),
            image,
            id,
            kind: SocketMessageType::Chat,
        }
    }

    pub fn to_json(&self) -> ChatResult<String> {
        serde_json::to_string(self).context(SerializeFrameSnafu {
            stage: "serialize-outbound-frame",
        })
    }

    pub fn from_json(raw: &str) -> ChatResult<Self> {
        serde_json::from_str(raw).context(DecodeFrameSnafu {
            stage: "decode-socket-frame",
        })
    }
}

/// Avatar reference derived from a display name.
pub fn avatar_url(avatar_base_url: &str, username: &str) -> String {
    format!("{avatar_base_url}{username}")
}
