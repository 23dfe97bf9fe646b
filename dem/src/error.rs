use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported grid format {}", .0.display())]
    Format(PathBuf),

    #[error("invalid grid header, {0}")]
    Header(String),

    #[error("invalid grid sample {0:?}")]
    Sample(String),

    #[error("invalid grid len {actual} for {}, expected {expected}", .path.display())]
    Len {
        actual: u64,
        expected: u64,
        path: PathBuf,
    },
}
