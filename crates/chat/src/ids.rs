use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use uuid::{Builder, Uuid};

use crate::error::{ChatError, ChatResult, InvalidMessageIdSnafu};

/// Globally unique identifier carried by every outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new(raw: Uuid) -> Self {
        Self(raw)
    }

    /// Builds a version 4 id from caller-supplied randomness.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }

    pub fn parse(raw: &str) -> ChatResult<Self> {
        let parsed = Uuid::parse_str(raw).context(InvalidMessageIdSnafu {
            stage: "parse-message-id",
            raw: raw.to_string(),
        })?;
        Ok(Self(parsed))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<Uuid> for MessageId {
    fn from(value: Uuid) -> Self {
        Self::new(value)
    }
}

impl FromStr for MessageId {
    type Err = ChatError;

    fn from_str(raw: &str) -> ChatResult<Self> {
        Self::parse(raw)
    }
}

/// Source of fresh message ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> MessageId;
}

/// Random v4 ids drawn from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomIdGenerator<R> {
    rng: R,
}

impl<R: Rng> RandomIdGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomIdGenerator<rand::rngs::ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> IdGenerator for RandomIdGenerator<R> {
    fn next_id(&mut self) -> MessageId {
        MessageId::from_random_bytes(self.rng.r#gen())
    }
}
