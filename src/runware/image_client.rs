use crate::{
    error::{Result, RunwareError},
    logger,
    models::{GenerationConfig, ResultSet, TaskRequest},
    runware::{response, Transport},
};
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct ImageClient {
    transport: Arc<dyn Transport>,
}

impl ImageClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Validates, assembles and sends one generation task.
    ///
    /// Validation happens before anything goes over the wire.
    pub async fn run(&self, config: &GenerationConfig) -> Result<ResultSet> {
        let task = config.build_task()?;
        self.send(&task).await
    }

    /// Runs `config` and returns the requested representation of the first image.
    pub async fn image_data(&self, config: &GenerationConfig) -> Result<String> {
        let results = self.run(config).await?;
        results
            .image_data(config.output_type())
            .map(String::from)
    }

    /// Runs several configs concurrently; results come back in input order.
    pub async fn run_many(&self, configs: &[GenerationConfig]) -> Vec<Result<ResultSet>> {
        join_all(configs.iter().map(|config| self.run(config))).await
    }

    /// Runs on the tokio runtime in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, config: GenerationConfig) -> JoinHandle<Result<ResultSet>> {
        let client = self.clone();
        tokio::spawn(async move { client.run(&config).await })
    }

    /// Blocking variant for callers without a runtime.
    ///
    /// Builds a current-thread runtime per call, so it must not be called from
    /// inside an async context.
    pub fn run_blocking(&self, config: &GenerationConfig) -> Result<ResultSet> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RunwareError::Internal(format!("failed to start runtime: {}", e)))?;
        runtime.block_on(self.run(config))
    }

    pub fn to_json(&self, config: &GenerationConfig, pretty: bool) -> Result<String> {
        config.to_json(pretty)
    }

    async fn send(&self, task: &TaskRequest) -> Result<ResultSet> {
        let body = task.to_wire_body()?;
        log::info!(
            "🎨 Dispatching {} task {}",
            task.task_type(),
            task.task_uuid()
        );
        log::debug!("Request payload: {}", body);

        let _timer = logger::timer(&format!("{} {}", task.task_type(), task.task_uuid()));
        let response_body = self.transport.post(body).await?;
        response::parse_generation(&response_body)
    }
}
