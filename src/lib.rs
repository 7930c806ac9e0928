//! Client for the Runware image generation API.
//!
//! Build a [`GenerationConfig`], hand it to [`RunwareClient::image`] and read
//! the images out of the returned [`ResultSet`].

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod runware;

pub use config::RunwareConfig;
pub use error::{Result, RunwareError, ValidationError};
pub use models::*;
pub use runware::{HttpTransport, ImageClient, RunwareClient, Transport, UploadClient};
