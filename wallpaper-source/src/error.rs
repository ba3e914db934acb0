use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    /// No API credential was configured
    #[error("No access key configured for the image API")]
    MissingAccessKey,

    /// Could not build the HTTP client
    #[error("HTTP client initialization failed: {0}")]
    Client(String),

    /// Transport failure or undecodable body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// The search returned no photos
    #[error("Image API returned no results")]
    EmptyResponse,
}
