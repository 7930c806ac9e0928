use runware::{
    logger::{self, LoggerConfig},
    GenerationConfig, KnownModel, OutputType, RunwareClient, RunwareConfig, Scheduler,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    logger::init_with_config(LoggerConfig::development())?;

    let config = RunwareConfig::from_env();
    logger::log_config_info(&config);
    let client = RunwareClient::new(config)?;

    let mut request = GenerationConfig::text_to_image(
        "a lighthouse on a rocky coast at dusk, volumetric light, 35mm photo",
    );
    request
        .with_negative_prompt("blurry, low quality")
        .with_model_air(KnownModel::Flux)
        .with_scheduler(Scheduler::FlowMatchEuler)
        .with_output_type(OutputType::Url)
        .with_dimensions(1024, 768)?
        .with_steps(28)?
        .with_number_results(2)?;

    log::info!("📝 Task payload:\n{}", request.to_json(true)?);

    let results = client.image().run(&request).await?;
    for result in &results {
        println!(
            "{} -> {}",
            result.image_uuid,
            result.image_url.as_deref().unwrap_or("<no url>")
        );
    }
    if let Some(cost) = results.total_cost() {
        log::info!("💰 Total cost: ${:.4}", cost);
    }

    Ok(())
}
