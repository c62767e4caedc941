/// Underlying image resource loading
///
/// The cache never talks to the network directly; it drives an
/// `ImageLoader`. Dropping the future returned by `load` aborts the transfer.

use async_trait::async_trait;
use iced::widget::image::Handle;

use crate::error::ImageError;

/// Loads one image resource from its URL
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<Handle, ImageError>;
}

/// Fetches images over HTTP(S)
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<Handle, ImageError> {
        let transport = |source| ImageError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;

        // Reject HTML error pages and other non-image payloads up front
        if image::guess_format(&bytes).is_err() {
            return Err(ImageError::NotAnImage {
                url: url.to_string(),
            });
        }

        Ok(Handle::from_bytes(bytes.to_vec()))
    }
}
