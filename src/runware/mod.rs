pub mod image_client;
pub mod response;
pub mod transport;
pub mod upload_client;

#[cfg(test)]
pub(crate) mod mock;

use crate::{config::RunwareConfig, error::Result};
use std::sync::Arc;

pub use image_client::ImageClient;
pub use transport::{HttpTransport, Transport};
pub use upload_client::UploadClient;

/// Entry point: one shared transport behind the image and upload clients.
#[derive(Clone)]
pub struct RunwareClient {
    image_client: ImageClient,
    upload_client: UploadClient,
}

impl RunwareClient {
    /// HTTP client for the configured endpoint. Fails without an API key.
    pub fn new(config: RunwareConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(RunwareConfig::from_env())
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            image_client: ImageClient::new(transport.clone()),
            upload_client: UploadClient::new(transport),
        }
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn upload(&self) -> &UploadClient {
        &self.upload_client
    }
}
