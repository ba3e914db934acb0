use thiserror::Error;
use wallpaper_core::StoreError;
use wallpaper_source::SourceError;

pub type Result<T> = std::result::Result<T, ControllerError>;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Random image fetch failed: {0}")]
    Source(#[from] SourceError),

    /// The bytes are not an image we can display
    #[error("Image could not be decoded: {0}")]
    Decode(String),
}
