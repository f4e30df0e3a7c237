use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame is not a valid event object: {0}")]
    Malformed(#[from] serde_json::Error),
}
