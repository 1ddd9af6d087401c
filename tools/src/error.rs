use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{len} bytes is not a square image")]
    NotSquare { len: usize },

    #[error("VGA frame is {len} bytes, expected {expected}")]
    FrameSize { len: usize, expected: usize },

    #[error("image of {len} bytes does not fit the {max} byte board buffer")]
    TooLong { len: usize, max: usize },

    #[error("no bytes to transfer")]
    NothingPending,

    #[error("{} is empty", path.display())]
    Empty { path: PathBuf },
}
