use runware::{logger, ModelUpload, RunwareClient, RunwareError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    logger::init()?;

    let download_url = env::var("LORA_DOWNLOAD_URL")?;
    let client = RunwareClient::from_env()?;

    let upload = ModelUpload::lora(
        "mycompany:100@1",
        "mycompany-watercolor-lora",
        "Watercolor",
        "1.0",
        download_url,
    )?
    .with_default_weight(0.8);

    match client.upload().upload_model(&upload).await {
        Ok(air) => println!("model registered as {}", air),
        Err(RunwareError::Api { status, body }) => {
            log::error!("❌ Upload rejected ({}): {}", status, body);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
