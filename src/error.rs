use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error creating {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("error writing {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed results line: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
