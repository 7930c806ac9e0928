use crate::{
    error::Result,
    logger,
    models::{ImageUpload, ModelUpload, TaskRequest},
    runware::{response, Transport},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct UploadClient {
    transport: Arc<dyn Transport>,
}

impl UploadClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Registers an image and returns its `imageUUID`.
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<String> {
        let task = TaskRequest::image_upload(upload)?;
        self.send(&task, "imageUUID").await
    }

    /// Registers a model and returns the AIR the API assigned to it.
    pub async fn upload_model(&self, upload: &ModelUpload) -> Result<String> {
        let task = TaskRequest::model_upload(upload)?;
        log::info!("📦 Uploading {} model {}", upload.category, upload.air);
        self.send(&task, "air").await
    }

    async fn send(&self, task: &TaskRequest, field: &str) -> Result<String> {
        let body = task.to_wire_body()?;
        log::info!(
            "📤 Dispatching {} task {}",
            task.task_type(),
            task.task_uuid()
        );

        let _timer = logger::timer(&format!("{} {}", task.task_type(), task.task_uuid()));
        let response_body = self.transport.post(body).await?;
        response::parse_upload(&response_body, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunwareError;
    use crate::runware::mock::MockTransport;

    #[tokio::test]
    async fn image_upload_returns_uuid() {
        let transport = Arc::new(MockTransport::replying(r#"{"data":{"imageUUID":"abc-123"}}"#));
        let client = UploadClient::new(transport.clone());
        let upload = ImageUpload::from_bytes(b"hello").unwrap();

        assert_eq!(client.upload_image(&upload).await.unwrap(), "abc-123");

        let batch: serde_json::Value = serde_json::from_str(&transport.bodies()[0]).unwrap();
        assert_eq!(batch[0]["taskType"], "imageUpload");
        assert_eq!(batch[0]["image"], "aGVsbG8=");
    }

    #[tokio::test]
    async fn model_upload_returns_air() {
        let transport = Arc::new(MockTransport::replying(
            r#"{"data":[{"taskType":"modelUpload","air":"mycompany:1@1","status":"ready"}]}"#,
        ));
        let client = UploadClient::new(transport.clone());
        let upload = ModelUpload::lora(
            "mycompany:1@1",
            "style-lora",
            "Style",
            "1",
            "https://example.com/style.safetensors",
        )
        .unwrap();

        assert_eq!(client.upload_model(&upload).await.unwrap(), "mycompany:1@1");

        let batch: serde_json::Value = serde_json::from_str(&transport.bodies()[0]).unwrap();
        assert_eq!(batch[0]["taskType"], "modelUpload");
        assert_eq!(batch[0]["category"], "lora");
        assert_eq!(batch[0]["uniqueIdentifier"], "style-lora");
    }

    #[tokio::test]
    async fn missing_identifier_is_a_decode_error() {
        let client = UploadClient::new(Arc::new(MockTransport::replying(
            r#"{"data":{"taskUUID":"t"}}"#,
        )));
        let upload = ImageUpload::new("https://example.com/cat.png").unwrap();
        assert!(matches!(
            client.upload_image(&upload).await,
            Err(RunwareError::Decode(_))
        ));
    }
}
