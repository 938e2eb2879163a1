use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed path")]
    MalformedPath,
    #[error("file or directory not found")]
    NotFound,
    #[error("file or directory already exists")]
    AlreadyExists,
    #[error("not a directory")]
    NotADirectory,
    #[error("is a directory")]
    IsADirectory,
    #[error("directory not empty")]
    DirectoryNotEmpty,
    #[error("resource busy")]
    ResourceBusy,
    #[error("bad file descriptor")]
    BadDescriptor,
    #[error("access denied")]
    AccessDenied,
    #[error("too many open files")]
    TooManyOpenFiles,
    #[error("invalid offset")]
    InvalidOffset,
    #[error("invalid open flags")]
    InvalidOpenFlags,
}
