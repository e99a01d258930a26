use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AppError {
    #[snafu(display("failed to open store on `{stage}`: {source}"))]
    OpenStore {
        stage: &'static str,
        source: natter_storage::StorageError,
    },
    #[snafu(display("failed to connect to '{url}' on `{stage}`: {source}"))]
    Connect {
        stage: &'static str,
        url: String,
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },
    #[snafu(display("failed to read terminal input on `{stage}`: {source}"))]
    ReadInput {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("failed to write terminal output on `{stage}`: {source}"))]
    WriteOutput {
        stage: &'static str,
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;
