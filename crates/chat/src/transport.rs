use snafu::Snafu;

/// Outbound half of the duplex connection.
///
/// `send` is fire-and-forget: it hands the frame over without waiting for
/// the server to acknowledge it.
pub trait Transport {
    fn send(&self, frame: &str) -> Result<(), TransportError>;
}

impl<T> Transport for &T
where
    T: Transport + ?Sized,
{
    fn send(&self, frame: &str) -> Result<(), TransportError> {
        (**self).send(frame)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("transport channel is closed on `{stage}`"))]
    Closed { stage: &'static str },
    #[snafu(display("transport rejected frame on `{stage}`: {details}"))]
    Rejected {
        stage: &'static str,
        details: String,
    },
}
