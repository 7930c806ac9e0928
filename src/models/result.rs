use crate::error::{Result, RunwareError};
use crate::models::OutputType;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// One generated image as reported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(rename = "taskType", default)]
    pub task_type: String,
    #[serde(rename = "imageUUID", default)]
    pub image_uuid: String,
    #[serde(rename = "taskUUID", default)]
    pub task_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "imageBase64Data", default, skip_serializing_if = "Option::is_none")]
    pub image_base64_data: Option<String>,
    #[serde(rename = "imageDataURI", default, skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl GenerationResult {
    pub fn image_data(&self, output_type: OutputType) -> Option<&str> {
        match output_type {
            OutputType::Url => self.image_url.as_deref(),
            OutputType::Base64Data => self.image_base64_data.as_deref(),
            OutputType::DataUri => self.image_data_uri.as_deref(),
        }
    }

    /// Raw image bytes from the base64 or data-URI representation.
    ///
    /// URL-only results have to be downloaded by the caller.
    pub fn image_bytes(&self) -> Result<Vec<u8>> {
        let encoded = if let Some(data) = &self.image_base64_data {
            data.as_str()
        } else if let Some(uri) = &self.image_data_uri {
            uri.split_once(";base64,")
                .map(|(_, payload)| payload)
                .ok_or_else(|| RunwareError::Decode("data URI is not base64 encoded".into()))?
        } else {
            return Err(RunwareError::OutputNotFound(OutputType::Base64Data));
        };

        general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| RunwareError::Decode(format!("invalid base64 image data: {}", e)))
    }
}

/// Results of one task, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    results: Vec<GenerationResult>,
}

impl ResultSet {
    pub fn new(results: Vec<GenerationResult>) -> Self {
        Self { results }
    }

    pub fn first(&self) -> Option<&GenerationResult> {
        self.results.first()
    }

    pub fn get(&self, index: usize) -> Option<&GenerationResult> {
        self.results.get(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenerationResult> {
        self.results.iter()
    }

    /// Requested representation of the first image.
    pub fn image_data(&self, output_type: OutputType) -> Result<&str> {
        self.first()
            .and_then(|result| result.image_data(output_type))
            .ok_or(RunwareError::OutputNotFound(output_type))
    }

    /// Sum of the reported per-image cost, if any image reported one.
    pub fn total_cost(&self) -> Option<f64> {
        self.results
            .iter()
            .filter_map(|result| result.cost)
            .fold(None, |acc, cost| Some(acc.unwrap_or(0.0) + cost))
    }

    pub fn into_vec(self) -> Vec<GenerationResult> {
        self.results
    }
}

impl IntoIterator for ResultSet {
    type Item = GenerationResult;
    type IntoIter = std::vec::IntoIter<GenerationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a GenerationResult;
    type IntoIter = std::slice::Iter<'a, GenerationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
