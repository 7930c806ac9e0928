use crate::error::{Result, RunwareError, ValidationError};
use crate::models::generation::PHOTO_MAKER_MAX_INPUT_IMAGES;
use crate::models::{
    attachments::AcceleratorPayload, ControlNet, Embedding, GenerationConfig, GenerationMode,
    ImageUpload, IpAdapter, Lora, ModelAir, ModelUpload, OutputFormat, OutputType, Outpainting,
    PhotoMakerStyle, PromptWeighting, Refiner, Scheduler, TaskType,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Immutable snapshot of one task, ready to be sent.
///
/// Every constructor generates a fresh v4 `taskUUID`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    task_type: TaskType,
    task_uuid: Uuid,
    output_type: Option<OutputType>,
    payload: Map<String, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InferencePayload<'a> {
    task_type: TaskType,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    output_type: OutputType,
    output_format: OutputFormat,
    positive_prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<&'a str>,
    height: u32,
    width: u32,
    model: &'a ModelAir,
    steps: u32,
    #[serde(rename = "CFGScale")]
    cfg_scale: f64,
    number_results: u32,
    #[serde(rename = "checkNSFW")]
    check_nsfw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_cost: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clip_skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduler: Option<Scheduler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_weighting: Option<PromptWeighting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vae: Option<&'a ModelAir>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refiner: Option<&'a Refiner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lora: Option<&'a [Lora]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    control_net: Option<&'a [ControlNet]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ip_adapters: Option<&'a [IpAdapter]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeddings: Option<&'a [Embedding]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inputs: Option<ReferenceInputs<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accelerator_options: Option<AcceleratorPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mask_image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outpainting: Option<&'a Outpainting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_images: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<PhotoMakerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceInputs<'a> {
    reference_images: &'a [String],
}

#[derive(Serialize)]
struct ImageUploadPayload<'a> {
    #[serde(rename = "taskType")]
    task_type: TaskType,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    image: &'a str,
}

#[derive(Serialize)]
struct ModelUploadPayload<'a> {
    #[serde(rename = "taskType")]
    task_type: TaskType,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    #[serde(flatten)]
    model: &'a ModelUpload,
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    (!items.is_empty()).then_some(items)
}

/// Seed image, mask, outpainting block and input images required by each mode.
struct ModeInputs<'a> {
    seed_image: Option<&'a str>,
    mask_image: Option<&'a str>,
    outpainting: Option<&'a Outpainting>,
    input_images: Option<&'a [String]>,
    style: Option<PhotoMakerStyle>,
    strength: Option<f64>,
}

impl<'a> ModeInputs<'a> {
    fn resolve(config: &'a GenerationConfig) -> Result<Self> {
        let mut inputs = ModeInputs {
            seed_image: None,
            mask_image: None,
            outpainting: None,
            input_images: None,
            style: None,
            strength: None,
        };

        let seed_image = || {
            config
                .seed_image
                .as_deref()
                .ok_or(ValidationError::Required { field: "seedImage" })
        };

        match config.mode {
            GenerationMode::TextToImage => {
                if config.seed_image.is_some() || config.mask_image.is_some() {
                    log::warn!("Seed and mask images are ignored for text-to-image tasks");
                }
            }
            GenerationMode::ImageToImage => {
                inputs.seed_image = Some(seed_image()?);
                inputs.strength = Some(config.strength);
            }
            GenerationMode::Inpainting => {
                inputs.seed_image = Some(seed_image()?);
                inputs.mask_image = Some(
                    config
                        .mask_image
                        .as_deref()
                        .ok_or(ValidationError::Required { field: "maskImage" })?,
                );
                inputs.strength = Some(config.strength);
            }
            GenerationMode::Outpainting => {
                inputs.seed_image = Some(seed_image()?);
                let options = config
                    .outpainting
                    .as_ref()
                    .filter(|options| options.extends_canvas())
                    .ok_or(ValidationError::Required {
                        field: "outpainting",
                    })?;
                inputs.outpainting = Some(options);
                inputs.strength = Some(config.strength);
            }
            GenerationMode::PhotoMaker => {
                if config.input_images.is_empty() {
                    return Err(ValidationError::Required {
                        field: "inputImages",
                    }
                    .into());
                }
                if config.input_images.len() > PHOTO_MAKER_MAX_INPUT_IMAGES {
                    return Err(ValidationError::TooMany {
                        field: "inputImages",
                        max: PHOTO_MAKER_MAX_INPUT_IMAGES,
                    }
                    .into());
                }
                inputs.input_images = Some(&config.input_images);
                inputs.style = Some(config.style);
                inputs.strength = Some(config.strength);
            }
        }

        Ok(inputs)
    }
}

impl TaskRequest {
    /// Assembles an `imageInference` (or `photoMaker`) task from builder state.
    pub fn from_generation(config: &GenerationConfig) -> Result<Self> {
        if config.positive_prompt.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "positivePrompt",
            }
            .into());
        }
        let mode = ModeInputs::resolve(config)?;

        let task_type = match config.mode {
            GenerationMode::PhotoMaker => TaskType::PhotoMaker,
            _ => TaskType::ImageInference,
        };
        let task_uuid = Uuid::new_v4();

        let payload = InferencePayload {
            task_type,
            task_uuid,
            output_type: config.output_type,
            output_format: config.output_format,
            positive_prompt: &config.positive_prompt,
            negative_prompt: (!config.negative_prompt.is_empty())
                .then_some(config.negative_prompt.as_str()),
            height: config.height,
            width: config.width,
            model: &config.model,
            steps: config.steps,
            cfg_scale: config.cfg_scale,
            number_results: config.number_results,
            check_nsfw: config.check_nsfw,
            include_cost: config.include_cost.then_some(true),
            clip_skip: (config.clip_skip > 0).then_some(config.clip_skip),
            scheduler: config.scheduler,
            prompt_weighting: config.prompt_weighting,
            vae: config.vae.as_ref(),
            refiner: config.refiner.as_ref(),
            lora: non_empty(&config.loras),
            control_net: non_empty(&config.control_nets),
            ip_adapters: non_empty(&config.ip_adapters),
            embeddings: non_empty(&config.embeddings),
            images: non_empty(&config.images),
            inputs: non_empty(&config.reference_images)
                .map(|reference_images| ReferenceInputs { reference_images }),
            accelerator_options: config.accelerator.to_payload(),
            seed_image: mode.seed_image,
            mask_image: mode.mask_image,
            outpainting: mode.outpainting,
            input_images: mode.input_images,
            style: mode.style,
            strength: mode.strength,
        };

        let mut payload = to_object(&payload)?;
        for field in &config.excluded_fields {
            payload.remove(field);
        }

        Ok(Self {
            task_type,
            task_uuid,
            output_type: Some(config.output_type),
            payload,
        })
    }

    pub fn image_upload(upload: &ImageUpload) -> Result<Self> {
        let task_uuid = Uuid::new_v4();
        let payload = to_object(&ImageUploadPayload {
            task_type: TaskType::ImageUpload,
            task_uuid,
            image: upload.image(),
        })?;
        Ok(Self {
            task_type: TaskType::ImageUpload,
            task_uuid,
            output_type: None,
            payload,
        })
    }

    pub fn model_upload(upload: &ModelUpload) -> Result<Self> {
        let task_uuid = Uuid::new_v4();
        let payload = to_object(&ModelUploadPayload {
            task_type: TaskType::ModelUpload,
            task_uuid,
            model: upload,
        })?;
        Ok(Self {
            task_type: TaskType::ModelUpload,
            task_uuid,
            output_type: None,
            payload,
        })
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn task_uuid(&self) -> Uuid {
        self.task_uuid
    }

    /// Representation requested for generated images; `None` for uploads.
    pub fn output_type(&self) -> Option<OutputType> {
        self.output_type
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(&self.payload)
        } else {
            serde_json::to_string(&self.payload)
        };
        rendered.map_err(|e| RunwareError::Serialization(e.to_string()))
    }

    /// HTTP body: the API takes a batch, so the task goes in a one-element array.
    pub fn to_wire_body(&self) -> Result<String> {
        serde_json::to_string(&[&self.payload])
            .map_err(|e| RunwareError::Serialization(e.to_string()))
    }
}

fn to_object<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RunwareError::Serialization(format!(
            "task payload serialized to a non-object: {}",
            other
        ))),
        Err(e) => Err(RunwareError::Serialization(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ControlMode, KnownModel};
    use serde_json::json;

    fn base_config() -> GenerationConfig {
        GenerationConfig::text_to_image("a red fox in the snow")
    }

    #[test]
    fn always_present_fields() {
        let task = base_config().build_task().unwrap();
        let payload = task.payload();

        assert_eq!(payload["taskType"], "imageInference");
        assert_eq!(payload["taskUUID"], task.task_uuid().to_string());
        assert_eq!(task.task_uuid().get_version_num(), 4);
        assert_eq!(payload["outputType"], "URL");
        assert_eq!(payload["outputFormat"], "JPG");
        assert_eq!(payload["positivePrompt"], "a red fox in the snow");
        assert_eq!(payload["height"], 1024);
        assert_eq!(payload["width"], 1024);
        assert_eq!(payload["model"], KnownModel::Flux.air_str());
        assert_eq!(payload["steps"], 20);
        assert_eq!(payload["CFGScale"], 7.0);
        assert_eq!(payload["numberResults"], 1);
        assert_eq!(payload["checkNSFW"], false);
        assert_eq!(payload["includeCost"], true);
    }

    #[test]
    fn defaults_are_omitted() {
        let task = base_config().build_task().unwrap();
        for absent in [
            "negativePrompt",
            "lora",
            "controlNet",
            "ipAdapters",
            "embeddings",
            "images",
            "inputs",
            "acceleratorOptions",
            "clipSkip",
            "scheduler",
            "promptWeighting",
            "vae",
            "refiner",
            "seedImage",
            "maskImage",
            "strength",
            "outpainting",
            "inputImages",
            "style",
            "checkNsfw",
        ] {
            assert!(task.get(absent).is_none(), "{} should be omitted", absent);
        }
    }

    #[test]
    fn every_build_gets_a_new_uuid() {
        let config = base_config();
        let first = config.build_task().unwrap();
        let second = config.build_task().unwrap();
        assert_ne!(first.task_uuid(), second.task_uuid());
    }

    #[test]
    fn lora_entries_keep_call_order() {
        let mut config = base_config();
        config
            .add_lora("civitai:1@1", 1.0)
            .unwrap()
            .add_lora("civitai:2@1", 0.25)
            .unwrap()
            .add_lora("civitai:3@1", 0.5)
            .unwrap();
        let task = config.build_task().unwrap();
        assert_eq!(
            task.get("lora").unwrap(),
            &json!([
                {"model": "civitai:1@1", "weight": 1.0},
                {"model": "civitai:2@1", "weight": 0.25},
                {"model": "civitai:3@1", "weight": 0.5}
            ])
        );
    }

    #[test]
    fn optional_blocks_when_set() {
        let mut config = base_config();
        config
            .with_negative_prompt("lowres")
            .with_scheduler(Scheduler::DpmPlusPlus2MKarras)
            .with_prompt_weighting(PromptWeighting::Compel)
            .with_tea_cache(true)
            .with_clip_skip(2)
            .unwrap()
            .with_vae("runware:100@1")
            .unwrap()
            .add_embedding("civitai:7808@9208", Some(0.7))
            .unwrap()
            .add_reference_image("ref-uuid")
            .unwrap()
            .add_control_net(
                ControlNet::new(ModelAir::parse("runware:20@1").unwrap(), "guide")
                    .unwrap()
                    .with_control_mode(ControlMode::Prompt),
            );

        let task = config.build_task().unwrap();
        assert_eq!(task.get("negativePrompt").unwrap(), "lowres");
        assert_eq!(task.get("scheduler").unwrap(), "DPM++ 2M Karras");
        assert_eq!(task.get("promptWeighting").unwrap(), "compel");
        assert_eq!(task.get("clipSkip").unwrap(), 2);
        assert_eq!(task.get("vae").unwrap(), "runware:100@1");
        assert_eq!(
            task.get("acceleratorOptions").unwrap(),
            &json!({"teaCache": true})
        );
        assert_eq!(
            task.get("embeddings").unwrap(),
            &json!([{"model": "civitai:7808@9208", "weight": 0.7}])
        );
        assert_eq!(
            task.get("inputs").unwrap(),
            &json!({"referenceImages": ["ref-uuid"]})
        );
        assert_eq!(
            task.get("controlNet").unwrap(),
            &json!([{"model": "runware:20@1", "guideImage": "guide", "controlMode": "prompt"}])
        );
    }

    #[test]
    fn image_to_image_requires_seed() {
        let mut config = base_config();
        config.with_mode(GenerationMode::ImageToImage);
        assert!(matches!(
            config.build_task(),
            Err(RunwareError::Validation(ValidationError::Required { field: "seedImage" }))
        ));

        config.with_seed_image("seed-uuid").unwrap();
        let task = config.build_task().unwrap();
        assert_eq!(task.get("seedImage").unwrap(), "seed-uuid");
        assert_eq!(task.get("strength").unwrap(), &json!(0.8));
        assert!(task.get("maskImage").is_none());
    }

    #[test]
    fn inpainting_requires_mask() {
        let mut config = base_config();
        config
            .with_mode(GenerationMode::Inpainting)
            .with_seed_image("seed")
            .unwrap();
        assert!(matches!(
            config.build_task(),
            Err(RunwareError::Validation(ValidationError::Required { field: "maskImage" }))
        ));
        config.with_mask_image("mask").unwrap();
        let task = config.build_task().unwrap();
        assert_eq!(task.get("maskImage").unwrap(), "mask");
        assert_eq!(task.task_type(), TaskType::ImageInference);
    }

    #[test]
    fn outpainting_requires_extension() {
        let mut config = base_config();
        config
            .with_mode(GenerationMode::Outpainting)
            .with_seed_image("seed")
            .unwrap()
            .with_outpainting(Outpainting::new().blur(8).unwrap());
        assert!(config.build_task().is_err());

        config.with_outpainting(Outpainting::new().right(256).unwrap());
        let task = config.build_task().unwrap();
        assert_eq!(task.get("outpainting").unwrap(), &json!({"right": 256}));
        assert_eq!(task.get("seedImage").unwrap(), "seed");
    }

    #[test]
    fn photo_maker_assembly() {
        let mut config = GenerationConfig::photo_maker("portrait of img as an astronaut");
        assert!(matches!(
            config.build_task(),
            Err(RunwareError::Validation(ValidationError::Required {
                field: "inputImages"
            }))
        ));

        config
            .add_input_image("face-1")
            .unwrap()
            .add_input_image("face-2")
            .unwrap()
            .with_style(PhotoMakerStyle::Cinematic);
        let task = config.build_task().unwrap();
        assert_eq!(task.task_type(), TaskType::PhotoMaker);
        assert_eq!(task.get("taskType").unwrap(), "photoMaker");
        assert_eq!(task.get("inputImages").unwrap(), &json!(["face-1", "face-2"]));
        assert_eq!(task.get("style").unwrap(), "Cinematic");
        assert!(task.get("strength").is_some());
    }

    #[test]
    fn photo_maker_rejects_overflow_before_sending() {
        let mut config = GenerationConfig::photo_maker("portrait");
        config.input_images = (0..5).map(|i| format!("img-{}", i)).collect();
        assert!(matches!(
            config.build_task(),
            Err(RunwareError::Validation(ValidationError::TooMany { max: 4, .. }))
        ));
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let config = GenerationConfig::default();
        assert!(matches!(
            config.build_task(),
            Err(RunwareError::Validation(ValidationError::Required {
                field: "positivePrompt"
            }))
        ));
    }

    #[test]
    fn exclusion_list_is_applied_last() {
        let mut config = base_config();
        config
            .with_negative_prompt("lowres")
            .exclude_fields(["negativePrompt", "includeCost", "checkNSFW"]);
        let task = config.build_task().unwrap();
        assert!(task.get("negativePrompt").is_none());
        assert!(task.get("includeCost").is_none());
        assert!(task.get("checkNSFW").is_none());
        assert!(task.get("positivePrompt").is_some());
    }

    #[test]
    fn wire_body_is_batch_of_one() {
        let task = base_config().build_task().unwrap();
        let body: Value = serde_json::from_str(&task.to_wire_body().unwrap()).unwrap();
        let batch = body.as_array().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0]["taskUUID"], task.task_uuid().to_string());
    }

    #[test]
    fn uploads() {
        let task = TaskRequest::image_upload(&ImageUpload::new("data:image/png;base64,AAA").unwrap())
            .unwrap();
        assert_eq!(task.get("taskType").unwrap(), "imageUpload");
        assert_eq!(task.get("image").unwrap(), "data:image/png;base64,AAA");
        assert_eq!(task.output_type(), None);

        let model = ModelUpload::lora("acme:5@1", "acme-style", "Acme Style", "1", "https://x/y")
            .unwrap();
        let task = TaskRequest::model_upload(&model).unwrap();
        assert_eq!(task.get("taskType").unwrap(), "modelUpload");
        assert_eq!(task.get("air").unwrap(), "acme:5@1");
        assert_eq!(task.get("uniqueIdentifier").unwrap(), "acme-style");
        assert_eq!(task.get("category").unwrap(), "lora");
    }

    #[test]
    fn pretty_json_renders() {
        let json = base_config().to_json(true).unwrap();
        assert!(json.contains("\n"));
        assert!(json.contains("\"positivePrompt\": \"a red fox in the snow\""));
    }
}
