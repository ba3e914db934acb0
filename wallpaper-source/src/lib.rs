//! Random wallpaper discovery.
//!
//! An [`ImageSource`] hands back the bytes of one freshly picked image. The
//! bundled implementation talks to an Unsplash-compatible `photos/random`
//! endpoint: the first request returns a JSON list of photos, the second
//! downloads the first photo's raw image.

mod error;
mod unsplash;

use std::future::Future;

pub use error::{Result, SourceError};
pub use unsplash::{UnsplashConfig, UnsplashSource, DEFAULT_COLLECTION, DEFAULT_ENDPOINT};

/// Raw bytes of a downloaded image plus the URL they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Something that can produce a random image on demand.
pub trait ImageSource: Send + Sync {
    fn fetch_random(&self) -> impl Future<Output = Result<FetchedImage>> + Send;
}
