use snafu::Snafu;

use crate::transport::TransportError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("failed to serialize outbound frame on `{stage}`: {source}"))]
    SerializeFrame {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to decode inbound frame on `{stage}`: {source}"))]
    DecodeFrame {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to send message '{message_id}' on `{stage}`: {source}"))]
    Send {
        stage: &'static str,
        message_id: String,
        source: TransportError,
    },
    #[snafu(display("message id '{raw}' is invalid: {source}"))]
    InvalidMessageId {
        stage: &'static str,
        raw: String,
        source: uuid::Error,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
