use crate::error::{check_dimension, check_range, Result, ValidationError};
use crate::models::{
    AcceleratorOptions, ControlNet, Embedding, IpAdapter, KnownModel, Lora, ModelAir,
    OutputFormat, OutputType, Outpainting, PhotoMakerStyle, PromptWeighting, Refiner, Scheduler,
    TaskRequest,
};

pub const PHOTO_MAKER_MAX_INPUT_IMAGES: usize = 4;
pub const DEFAULT_STRENGTH: f64 = 0.8;

/// Which kind of inference task the config assembles into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationMode {
    #[default]
    TextToImage,
    /// Needs a seed image.
    ImageToImage,
    /// Needs a seed image and a mask image.
    Inpainting,
    /// Needs a seed image and outpainting options.
    Outpainting,
    /// Needs one to four input images.
    PhotoMaker,
}

/// Mutable builder state for one generation request.
///
/// Validating setters return `Result<&mut Self>` so they chain with `?`; a
/// rejected value leaves the config exactly as it was.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub(crate) mode: GenerationMode,
    pub(crate) positive_prompt: String,
    pub(crate) negative_prompt: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) model: ModelAir,
    pub(crate) steps: u32,
    pub(crate) cfg_scale: f64,
    pub(crate) number_results: u32,
    pub(crate) output_type: OutputType,
    pub(crate) output_format: OutputFormat,
    pub(crate) check_nsfw: bool,
    pub(crate) include_cost: bool,
    pub(crate) scheduler: Option<Scheduler>,
    pub(crate) clip_skip: u32,
    pub(crate) prompt_weighting: Option<PromptWeighting>,
    pub(crate) vae: Option<ModelAir>,
    pub(crate) refiner: Option<Refiner>,
    pub(crate) loras: Vec<Lora>,
    pub(crate) control_nets: Vec<ControlNet>,
    pub(crate) ip_adapters: Vec<IpAdapter>,
    pub(crate) embeddings: Vec<Embedding>,
    pub(crate) images: Vec<String>,
    pub(crate) reference_images: Vec<String>,
    pub(crate) accelerator: AcceleratorOptions,
    pub(crate) seed_image: Option<String>,
    pub(crate) mask_image: Option<String>,
    pub(crate) outpainting: Option<Outpainting>,
    pub(crate) strength: f64,
    pub(crate) input_images: Vec<String>,
    pub(crate) style: PhotoMakerStyle,
    pub(crate) excluded_fields: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            mode: GenerationMode::TextToImage,
            positive_prompt: String::new(),
            negative_prompt: String::new(),
            width: 1024,
            height: 1024,
            model: KnownModel::Flux.air(),
            steps: 20,
            cfg_scale: 7.0,
            number_results: 1,
            output_type: OutputType::Url,
            output_format: OutputFormat::Jpg,
            check_nsfw: false,
            include_cost: true,
            scheduler: None,
            clip_skip: 0,
            prompt_weighting: None,
            vae: None,
            refiner: None,
            loras: Vec::new(),
            control_nets: Vec::new(),
            ip_adapters: Vec::new(),
            embeddings: Vec::new(),
            images: Vec::new(),
            reference_images: Vec::new(),
            accelerator: AcceleratorOptions::default(),
            seed_image: None,
            mask_image: None,
            outpainting: None,
            strength: DEFAULT_STRENGTH,
            input_images: Vec::new(),
            style: PhotoMakerStyle::default(),
            excluded_fields: Vec::new(),
        }
    }
}

impl GenerationConfig {
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn text_to_image(prompt: impl Into<String>) -> Self {
        let mut config = Self::new(GenerationMode::TextToImage);
        config.positive_prompt = prompt.into();
        config
    }

    pub fn photo_maker(prompt: impl Into<String>) -> Self {
        let mut config = Self::new(GenerationMode::PhotoMaker);
        config.positive_prompt = prompt.into();
        config
    }

    /// Assembles a fresh task (new taskUUID on every call).
    pub fn build_task(&self) -> Result<TaskRequest> {
        TaskRequest::from_generation(self)
    }

    /// The task object as JSON, without sending it.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        self.build_task()?.to_json(pretty)
    }

    // ---- prompt & mode ----

    pub fn with_mode(&mut self, mode: GenerationMode) -> &mut Self {
        self.mode = mode;
        self
    }

    pub fn with_positive_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.positive_prompt = prompt.into();
        self
    }

    pub fn with_negative_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.negative_prompt = prompt.into();
        self
    }

    // ---- geometry & sampling ----

    pub fn with_width(&mut self, width: u32) -> Result<&mut Self> {
        check_dimension("width", width)?;
        self.width = width;
        Ok(self)
    }

    pub fn with_height(&mut self, height: u32) -> Result<&mut Self> {
        check_dimension("height", height)?;
        self.height = height;
        Ok(self)
    }

    pub fn with_dimensions(&mut self, width: u32, height: u32) -> Result<&mut Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;
        self.width = width;
        self.height = height;
        Ok(self)
    }

    pub fn with_model(&mut self, air: &str) -> Result<&mut Self> {
        self.model = ModelAir::parse(air)?;
        Ok(self)
    }

    pub fn with_model_air(&mut self, model: impl Into<ModelAir>) -> &mut Self {
        self.model = model.into();
        self
    }

    pub fn with_steps(&mut self, steps: u32) -> Result<&mut Self> {
        check_range("steps", f64::from(steps), 1.0, 100.0)?;
        self.steps = steps;
        Ok(self)
    }

    pub fn with_cfg_scale(&mut self, scale: f64) -> Result<&mut Self> {
        check_range("CFGScale", scale, 0.0, 30.0)?;
        self.cfg_scale = scale;
        Ok(self)
    }

    pub fn with_number_results(&mut self, number: u32) -> Result<&mut Self> {
        check_range("numberResults", f64::from(number), 1.0, 20.0)?;
        self.number_results = number;
        Ok(self)
    }

    pub fn with_scheduler(&mut self, scheduler: Scheduler) -> &mut Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn with_clip_skip(&mut self, skip: u32) -> Result<&mut Self> {
        check_range("clipSkip", f64::from(skip), 0.0, 2.0)?;
        self.clip_skip = skip;
        Ok(self)
    }

    pub fn with_prompt_weighting(&mut self, weighting: PromptWeighting) -> &mut Self {
        self.prompt_weighting = Some(weighting);
        self
    }

    // ---- output ----

    pub fn with_output_type(&mut self, output_type: OutputType) -> &mut Self {
        self.output_type = output_type;
        self
    }

    pub fn with_output_format(&mut self, format: OutputFormat) -> &mut Self {
        self.output_format = format;
        self
    }

    pub fn with_nsfw_check(&mut self, enabled: bool) -> &mut Self {
        self.check_nsfw = enabled;
        self
    }

    pub fn with_include_cost(&mut self, enabled: bool) -> &mut Self {
        self.include_cost = enabled;
        self
    }

    // ---- attachments ----

    pub fn add_lora(&mut self, model: &str, weight: f64) -> Result<&mut Self> {
        let model = ModelAir::parse(model)?;
        self.loras.push(Lora { model, weight });
        Ok(self)
    }

    pub fn add_control_net(&mut self, control_net: ControlNet) -> &mut Self {
        self.control_nets.push(control_net);
        self
    }

    pub fn add_ip_adapter(&mut self, adapter: IpAdapter) -> &mut Self {
        self.ip_adapters.push(adapter);
        self
    }

    pub fn add_embedding(&mut self, model: &str, weight: Option<f64>) -> Result<&mut Self> {
        let model = ModelAir::parse(model)?;
        self.embeddings.push(Embedding { model, weight });
        Ok(self)
    }

    pub fn with_vae(&mut self, vae: &str) -> Result<&mut Self> {
        self.vae = Some(ModelAir::parse(vae)?);
        Ok(self)
    }

    pub fn with_refiner(&mut self, refiner: Refiner) -> &mut Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn add_image(&mut self, image: impl Into<String>) -> Result<&mut Self> {
        let image = non_empty("images", image.into())?;
        self.images.push(image);
        Ok(self)
    }

    pub fn add_reference_image(&mut self, image: impl Into<String>) -> Result<&mut Self> {
        let image = non_empty("referenceImages", image.into())?;
        self.reference_images.push(image);
        Ok(self)
    }

    pub fn with_reference_images(&mut self, images: Vec<String>) -> Result<&mut Self> {
        if images.is_empty() {
            return Err(ValidationError::Empty {
                field: "referenceImages",
            }
            .into());
        }
        if images.iter().any(String::is_empty) {
            return Err(ValidationError::Empty {
                field: "referenceImages",
            }
            .into());
        }
        self.reference_images = images;
        Ok(self)
    }

    // ---- accelerator ----

    pub fn with_tea_cache(&mut self, enabled: bool) -> &mut Self {
        self.accelerator.tea_cache = enabled;
        self
    }

    pub fn with_tea_cache_distance(&mut self, distance: f64) -> Result<&mut Self> {
        check_range("teaCacheDistance", distance, 0.0, 1.0)?;
        self.accelerator.tea_cache_distance = distance;
        Ok(self)
    }

    pub fn with_deep_cache(&mut self, enabled: bool) -> &mut Self {
        self.accelerator.deep_cache = enabled;
        self
    }

    pub fn with_deep_cache_interval(&mut self, interval: u32) -> Result<&mut Self> {
        if interval < 1 {
            return Err(ValidationError::AtLeast {
                field: "deepCacheInterval",
                min: 1,
            }
            .into());
        }
        self.accelerator.deep_cache_interval = interval;
        Ok(self)
    }

    pub fn with_deep_cache_branch_id(&mut self, branch_id: i32) -> Result<&mut Self> {
        let branch_id = u32::try_from(branch_id).map_err(|_| ValidationError::AtLeast {
            field: "deepCacheBranchId",
            min: 0,
        })?;
        self.accelerator.deep_cache_branch_id = branch_id;
        Ok(self)
    }

    // ---- mode-specific inputs ----

    pub fn with_seed_image(&mut self, image: impl Into<String>) -> Result<&mut Self> {
        self.seed_image = Some(non_empty("seedImage", image.into())?);
        Ok(self)
    }

    pub fn with_mask_image(&mut self, image: impl Into<String>) -> Result<&mut Self> {
        self.mask_image = Some(non_empty("maskImage", image.into())?);
        Ok(self)
    }

    pub fn with_outpainting(&mut self, options: Outpainting) -> &mut Self {
        self.outpainting = Some(options);
        self
    }

    pub fn with_strength(&mut self, strength: f64) -> Result<&mut Self> {
        check_range("strength", strength, 0.0, 1.0)?;
        self.strength = strength;
        Ok(self)
    }

    pub fn add_input_image(&mut self, image: impl Into<String>) -> Result<&mut Self> {
        if self.input_images.len() >= PHOTO_MAKER_MAX_INPUT_IMAGES {
            return Err(ValidationError::TooMany {
                field: "inputImages",
                max: PHOTO_MAKER_MAX_INPUT_IMAGES,
            }
            .into());
        }
        let image = non_empty("inputImages", image.into())?;
        self.input_images.push(image);
        Ok(self)
    }

    pub fn with_input_images(&mut self, images: Vec<String>) -> Result<&mut Self> {
        if images.is_empty() {
            return Err(ValidationError::Required {
                field: "inputImages",
            }
            .into());
        }
        if images.len() > PHOTO_MAKER_MAX_INPUT_IMAGES {
            return Err(ValidationError::TooMany {
                field: "inputImages",
                max: PHOTO_MAKER_MAX_INPUT_IMAGES,
            }
            .into());
        }
        if images.iter().any(String::is_empty) {
            return Err(ValidationError::Empty {
                field: "inputImages",
            }
            .into());
        }
        self.input_images = images;
        Ok(self)
    }

    pub fn with_style(&mut self, style: PhotoMakerStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Top-level fields dropped from the assembled task, even when populated.
    pub fn exclude_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.excluded_fields.contains(&field) {
                self.excluded_fields.push(field);
            }
        }
        self
    }

    // ---- accessors ----

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn positive_prompt(&self) -> &str {
        &self.positive_prompt
    }

    pub fn negative_prompt(&self) -> &str {
        &self.negative_prompt
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn model(&self) -> &ModelAir {
        &self.model
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn cfg_scale(&self) -> f64 {
        self.cfg_scale
    }

    pub fn number_results(&self) -> u32 {
        self.number_results
    }

    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn loras(&self) -> &[Lora] {
        &self.loras
    }

    pub fn accelerator(&self) -> &AcceleratorOptions {
        &self.accelerator
    }

    pub fn input_images(&self) -> &[String] {
        &self.input_images
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn excluded_fields(&self) -> &[String] {
        &self.excluded_fields
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunwareError;

    #[test]
    fn accepts_every_valid_dimension() {
        let mut config = GenerationConfig::default();
        for value in (128..=2048).step_by(64) {
            config.with_width(value).unwrap().with_height(value).unwrap();
            assert_eq!(config.width(), value);
            assert_eq!(config.height(), value);
        }
    }

    #[test]
    fn rejected_dimension_leaves_state_unchanged() {
        let mut config = GenerationConfig::default();
        config.with_dimensions(512, 768).unwrap();

        for bad in [0, 64, 127, 129, 500, 2049, 2112, 4096] {
            assert!(config.with_width(bad).is_err(), "width {} accepted", bad);
            assert!(config.with_height(bad).is_err(), "height {} accepted", bad);
        }
        assert!(config.with_dimensions(512, 100).is_err());
        assert_eq!(config.width(), 512);
        assert_eq!(config.height(), 768);
    }

    #[test]
    fn sampler_ranges() {
        let mut config = GenerationConfig::default();
        assert!(config.with_steps(0).is_err());
        assert!(config.with_steps(101).is_err());
        assert!(config.with_steps(1).is_ok());
        assert!(config.with_steps(100).is_ok());

        assert!(config.with_cfg_scale(-0.1).is_err());
        assert!(config.with_cfg_scale(30.5).is_err());
        assert!(config.with_cfg_scale(0.0).is_ok());
        assert!(config.with_cfg_scale(30.0).is_ok());

        assert!(config.with_number_results(0).is_err());
        assert!(config.with_number_results(21).is_err());
        assert!(config.with_number_results(20).is_ok());

        assert!(config.with_clip_skip(3).is_err());
        assert!(config.with_clip_skip(2).is_ok());

        assert_eq!(config.steps(), 100);
        assert_eq!(config.cfg_scale(), 30.0);
        assert_eq!(config.number_results(), 20);
    }

    #[test]
    fn accelerator_ranges() {
        let mut config = GenerationConfig::default();
        assert!(config.with_tea_cache_distance(1.5).is_err());
        assert!(config.with_tea_cache_distance(-0.5).is_err());
        assert!(config.with_tea_cache_distance(0.2).is_ok());
        assert!(matches!(
            config.with_deep_cache_interval(0),
            Err(RunwareError::Validation(ValidationError::AtLeast { min: 1, .. }))
        ));
        assert!(config.with_deep_cache_branch_id(-1).is_err());
        assert!(config.with_deep_cache_branch_id(0).is_ok());
        assert_eq!(config.accelerator().tea_cache_distance, 0.2);
    }

    #[test]
    fn chained_setters() -> Result<()> {
        let mut config = GenerationConfig::text_to_image("a lighthouse at dusk");
        config
            .with_width(768)?
            .with_height(512)?
            .with_steps(30)?
            .with_cfg_scale(6.5)?
            .with_negative_prompt("blurry")
            .with_output_format(OutputFormat::Webp)
            .add_lora("civitai:58390@62833", 0.8)?
            .add_lora("civitai:82098@87153", 0.5)?;

        assert_eq!(config.width(), 768);
        assert_eq!(config.negative_prompt(), "blurry");
        assert_eq!(config.loras().len(), 2);
        assert_eq!(config.loras()[0].model.as_str(), "civitai:58390@62833");
        Ok(())
    }

    #[test]
    fn invalid_model_air_is_rejected() {
        let mut config = GenerationConfig::default();
        assert!(config.with_model("not an air").is_err());
        assert_eq!(config.model(), &KnownModel::Flux.air());
        assert!(config.add_lora("missing-namespace", 1.0).is_err());
        assert!(config.loras().is_empty());
    }

    #[test]
    fn photo_maker_input_limits() {
        let mut config = GenerationConfig::photo_maker("portrait");
        for i in 0..4 {
            config.add_input_image(format!("img-{}", i)).unwrap();
        }
        assert!(matches!(
            config.add_input_image("img-5"),
            Err(RunwareError::Validation(ValidationError::TooMany { max: 4, .. }))
        ));
        assert_eq!(config.input_images().len(), 4);

        let five: Vec<String> = (0..5).map(|i| format!("img-{}", i)).collect();
        assert!(matches!(
            config.with_input_images(five),
            Err(RunwareError::Validation(ValidationError::TooMany { .. }))
        ));
        assert!(matches!(
            config.with_input_images(Vec::new()),
            Err(RunwareError::Validation(ValidationError::Required { .. }))
        ));
        assert!(config.add_image("").is_err());
    }

    #[test]
    fn strength_range() {
        let mut config = GenerationConfig::new(GenerationMode::ImageToImage);
        assert_eq!(config.strength(), DEFAULT_STRENGTH);
        assert!(config.with_strength(1.2).is_err());
        assert!(config.with_strength(0.35).is_ok());
        assert_eq!(config.strength(), 0.35);
    }

    #[test]
    fn excluded_fields_are_deduplicated() {
        let mut config = GenerationConfig::default();
        config
            .exclude_fields(["checkNSFW", "includeCost"])
            .exclude_fields(vec!["checkNSFW".to_string()]);
        assert_eq!(config.excluded_fields(), ["checkNSFW", "includeCost"]);
    }
}
