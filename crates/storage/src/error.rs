use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("storage lock was poisoned on `{stage}`"))]
    LockPoisoned { stage: &'static str },
    #[snafu(display("failed to create store directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to read store file at {path:?} on `{stage}`: {source}"))]
    ReadFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to parse store file at {path:?} on `{stage}`: {source}"))]
    ParseFile {
        stage: &'static str,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("failed to serialize store contents on `{stage}`: {source}"))]
    Serialize {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write store file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to replace store file from {from:?} to {to:?} on `{stage}`: {source}"))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("storage backend rejected `{key}` on `{stage}`: {details}"))]
    Backend {
        stage: &'static str,
        key: String,
        details: String,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
