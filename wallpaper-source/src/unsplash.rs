use crate::error::{Result, SourceError};
use crate::{FetchedImage, ImageSource};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.unsplash.com";
pub const DEFAULT_COLLECTION: &str = "1053828";

#[derive(Debug, Clone)]
pub struct UnsplashConfig {
    pub endpoint: String,
    pub access_key: Option<String>,
    pub collection: Option<String>,
    pub timeout: Duration,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_key: None,
            collection: Some(DEFAULT_COLLECTION.to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    raw: String,
}

pub struct UnsplashSource {
    client: Client,
    config: UnsplashConfig,
}

impl UnsplashSource {
    pub fn new(config: UnsplashConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn random_url(&self) -> String {
        let mut url = format!(
            "{}/photos/random?count=1",
            self.config.endpoint.trim_end_matches('/')
        );
        if let Some(collection) = &self.config.collection {
            url.push_str("&collections=");
            url.push_str(collection);
        }
        url
    }

    /// Ask the API for one random photo and return its raw image URL.
    pub async fn discover(&self) -> Result<String> {
        let key = self
            .config
            .access_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SourceError::MissingAccessKey)?;

        let url = self.random_url();
        log::debug!("Requesting random photo from {}", url);
        let res = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Client-ID {}", key))
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(SourceError::Status {
                url,
                status: res.status().as_u16(),
            });
        }

        let photos: Vec<Photo> = res.json().await?;
        photos
            .into_iter()
            .next()
            .map(|p| p.urls.raw)
            .ok_or(SourceError::EmptyResponse)
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let res = self.client.get(url).send().await?;
        if !res.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }
        let bytes = res.bytes().await?;
        log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

impl ImageSource for UnsplashSource {
    async fn fetch_random(&self) -> Result<FetchedImage> {
        let url = self.discover().await?;
        let bytes = self.download(&url).await?;
        Ok(FetchedImage { url, bytes })
    }
}
