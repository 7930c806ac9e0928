use runware::{
    logger, GenerationConfig, ImageUpload, OutputFormat, OutputType, PhotoMakerStyle,
    RunwareClient,
};
use std::{env, fs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    logger::init()?;

    let client = RunwareClient::from_env()?;

    // Reference faces: local files are uploaded first, anything else is passed through.
    let mut request = GenerationConfig::photo_maker("portrait of img person as an astronaut");
    for source in env::args().skip(1).take(4) {
        let image = match fs::read(&source) {
            Ok(bytes) => {
                let uuid = client
                    .upload()
                    .upload_image(&ImageUpload::from_bytes(&bytes)?)
                    .await?;
                log::info!("📤 Uploaded {} as {}", source, uuid);
                uuid
            }
            Err(_) => source,
        };
        request.add_input_image(image)?;
    }

    request
        .with_style(PhotoMakerStyle::Cinematic)
        .with_output_type(OutputType::Base64Data)
        .with_output_format(OutputFormat::Png)
        .with_strength(0.4)?;

    let results = client.image().run(&request).await?;
    for (index, result) in results.iter().enumerate() {
        let path = format!("photo_maker_{}.png", index);
        fs::write(&path, result.image_bytes()?)?;
        println!("saved {}", path);
    }

    Ok(())
}
