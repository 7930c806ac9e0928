use crate::error::{check_range, Result, ValidationError};
use crate::models::{ModelAir, ModelCategory, Scheduler};
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

/// Image to register with the API so later tasks can refer to it by UUID.
///
/// Accepts a public URL, a data URI or a bare base64 string.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    image: String,
}

impl ImageUpload {
    pub fn new(image: impl Into<String>) -> Result<Self> {
        let image = image.into();
        if image.is_empty() {
            return Err(ValidationError::Required { field: "image" }.into());
        }
        Ok(Self { image })
    }

    /// Encodes raw image bytes as base64.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ValidationError::Required { field: "image" }.into());
        }
        Ok(Self {
            image: general_purpose::STANDARD.encode(bytes),
        })
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

/// Metadata for registering a checkpoint or LoRA hosted at `download_url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelUpload {
    pub air: ModelAir,
    #[serde(rename = "uniqueIdentifier")]
    pub unique_identifier: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub category: ModelCategory,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    pub architecture: String,
    pub format: String,
    pub private: bool,
    #[serde(rename = "defaultCFG", skip_serializing_if = "Option::is_none")]
    pub default_cfg: Option<f64>,
    #[serde(rename = "defaultSteps", skip_serializing_if = "Option::is_none")]
    pub default_steps: Option<u32>,
    #[serde(rename = "defaultScheduler", skip_serializing_if = "Option::is_none")]
    pub default_scheduler: Option<Scheduler>,
    #[serde(rename = "defaultStrength", skip_serializing_if = "Option::is_none")]
    pub default_strength: Option<f64>,
    #[serde(rename = "defaultWeight", skip_serializing_if = "Option::is_none")]
    pub default_weight: Option<f64>,
}

impl ModelUpload {
    /// Base checkpoint with the usual sampler defaults.
    pub fn checkpoint(
        air: &str,
        unique_identifier: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Result<Self> {
        let mut upload = Self::base(
            air,
            unique_identifier.into(),
            name.into(),
            version.into(),
            download_url.into(),
            ModelCategory::Checkpoint,
        )?;
        upload.model_type = Some("base".to_string());
        upload.architecture = "pony".to_string();
        upload.default_cfg = Some(3.5);
        upload.default_steps = Some(35);
        upload.default_scheduler = Some(Scheduler::DpmPlusPlus2M);
        upload.default_strength = Some(1.0);
        Ok(upload)
    }

    pub fn lora(
        air: &str,
        unique_identifier: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Result<Self> {
        let mut upload = Self::base(
            air,
            unique_identifier.into(),
            name.into(),
            version.into(),
            download_url.into(),
            ModelCategory::Lora,
        )?;
        upload.architecture = "flux1d".to_string();
        upload.default_weight = Some(1.0);
        Ok(upload)
    }

    fn base(
        air: &str,
        unique_identifier: String,
        name: String,
        version: String,
        download_url: String,
        category: ModelCategory,
    ) -> Result<Self> {
        for (field, value) in [
            ("uniqueIdentifier", &unique_identifier),
            ("name", &name),
            ("version", &version),
            ("downloadURL", &download_url),
        ] {
            if value.is_empty() {
                return Err(ValidationError::Required { field }.into());
            }
        }
        if air.is_empty() {
            return Err(ValidationError::Required { field: "air" }.into());
        }

        Ok(Self {
            air: ModelAir::parse(air)?,
            unique_identifier,
            name,
            version,
            download_url,
            category,
            model_type: None,
            architecture: String::new(),
            format: "safetensors".to_string(),
            private: true,
            default_cfg: None,
            default_steps: None,
            default_scheduler: None,
            default_strength: None,
            default_weight: None,
        })
    }

    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_default_cfg(mut self, cfg: f64) -> Result<Self> {
        check_range("defaultCFG", cfg, 0.0, 30.0)?;
        self.default_cfg = Some(cfg);
        Ok(self)
    }

    pub fn with_default_steps(mut self, steps: u32) -> Result<Self> {
        check_range("defaultSteps", f64::from(steps), 1.0, 100.0)?;
        self.default_steps = Some(steps);
        Ok(self)
    }

    pub fn with_default_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.default_scheduler = Some(scheduler);
        self
    }

    pub fn with_default_strength(mut self, strength: f64) -> Result<Self> {
        check_range("defaultStrength", strength, 0.0, 1.0)?;
        self.default_strength = Some(strength);
        Ok(self)
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = Some(weight);
        self
    }
}
