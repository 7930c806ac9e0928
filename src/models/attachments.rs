use crate::error::{check_range, Result, ValidationError};
use crate::models::{ControlMode, ModelAir};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lora {
    pub model: ModelAir,
    pub weight: f64,
}

/// Guide image plus the ControlNet model that interprets it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlNet {
    pub model: ModelAir,
    pub guide_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_step_percentage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_step_percentage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_mode: Option<ControlMode>,
}

impl ControlNet {
    pub fn new(model: ModelAir, guide_image: impl Into<String>) -> Result<Self> {
        let guide_image = guide_image.into();
        if guide_image.is_empty() {
            return Err(ValidationError::Empty {
                field: "controlNet.guideImage",
            }
            .into());
        }
        Ok(Self {
            model,
            guide_image,
            weight: None,
            start_step: None,
            end_step: None,
            start_step_percentage: None,
            end_step_percentage: None,
            control_mode: None,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        check_range("controlNet.weight", weight, 0.0, 1.0)?;
        self.weight = Some(weight);
        Ok(self)
    }

    pub fn with_steps(mut self, start_step: u32, end_step: u32) -> Result<Self> {
        if end_step <= start_step {
            return Err(ValidationError::AtLeast {
                field: "controlNet.endStep",
                min: i64::from(start_step) + 1,
            }
            .into());
        }
        self.start_step = Some(start_step);
        self.end_step = Some(end_step);
        Ok(self)
    }

    pub fn with_step_percentages(mut self, start: u32, end: u32) -> Result<Self> {
        check_range("controlNet.startStepPercentage", f64::from(start), 0.0, 99.0)?;
        check_range("controlNet.endStepPercentage", f64::from(end), 1.0, 100.0)?;
        if end <= start {
            return Err(ValidationError::AtLeast {
                field: "controlNet.endStepPercentage",
                min: i64::from(start) + 1,
            }
            .into());
        }
        self.start_step_percentage = Some(start);
        self.end_step_percentage = Some(end);
        Ok(self)
    }

    pub fn with_control_mode(mut self, mode: ControlMode) -> Self {
        self.control_mode = Some(mode);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAdapter {
    pub model: ModelAir,
    pub guide_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl IpAdapter {
    pub fn new(model: ModelAir, guide_image: impl Into<String>) -> Result<Self> {
        let guide_image = guide_image.into();
        if guide_image.is_empty() {
            return Err(ValidationError::Empty {
                field: "ipAdapters.guideImage",
            }
            .into());
        }
        Ok(Self {
            model,
            guide_image,
            weight: None,
        })
    }

    pub fn with_weight(mut self, weight: f64) -> Result<Self> {
        check_range("ipAdapters.weight", weight, 0.0, 1.0)?;
        self.weight = Some(weight);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embedding {
    pub model: ModelAir,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Second-stage model that takes over for the final steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refiner {
    pub model: ModelAir,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_step_percentage: Option<u32>,
}

impl Refiner {
    pub fn new(model: ModelAir) -> Self {
        Self {
            model,
            start_step: None,
            start_step_percentage: None,
        }
    }

    pub fn with_start_step(mut self, step: u32) -> Result<Self> {
        check_range("refiner.startStep", f64::from(step), 2.0, 100.0)?;
        self.start_step = Some(step);
        Ok(self)
    }

    pub fn with_start_step_percentage(mut self, percentage: u32) -> Result<Self> {
        check_range("refiner.startStepPercentage", f64::from(percentage), 1.0, 99.0)?;
        self.start_step_percentage = Some(percentage);
        Ok(self)
    }
}

/// Canvas extension for outpainting, in pixels per side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Outpainting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<u32>,
}

impl Outpainting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(mut self, pixels: u32) -> Result<Self> {
        self.top = Some(check_side("outpainting.top", pixels)?);
        Ok(self)
    }

    pub fn right(mut self, pixels: u32) -> Result<Self> {
        self.right = Some(check_side("outpainting.right", pixels)?);
        Ok(self)
    }

    pub fn bottom(mut self, pixels: u32) -> Result<Self> {
        self.bottom = Some(check_side("outpainting.bottom", pixels)?);
        Ok(self)
    }

    pub fn left(mut self, pixels: u32) -> Result<Self> {
        self.left = Some(check_side("outpainting.left", pixels)?);
        Ok(self)
    }

    pub fn blur(mut self, radius: u32) -> Result<Self> {
        check_range("outpainting.blur", f64::from(radius), 0.0, 32.0)?;
        self.blur = Some(radius);
        Ok(self)
    }

    /// At least one side has to grow for the task to make sense.
    pub fn extends_canvas(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .any(|side| side.unwrap_or(0) > 0)
    }
}

fn check_side(field: &'static str, pixels: u32) -> Result<u32> {
    if pixels % 64 != 0 {
        return Err(ValidationError::NotMultipleOf { field, step: 64 }.into());
    }
    Ok(pixels)
}

pub const DEFAULT_TEA_CACHE_DISTANCE: f64 = 0.5;
pub const DEFAULT_DEEP_CACHE_INTERVAL: u32 = 3;
pub const DEFAULT_DEEP_CACHE_BRANCH_ID: u32 = 0;

/// Inference caching hints. Only non-default members go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceleratorOptions {
    pub tea_cache: bool,
    pub tea_cache_distance: f64,
    pub deep_cache: bool,
    pub deep_cache_interval: u32,
    pub deep_cache_branch_id: u32,
}

impl Default for AcceleratorOptions {
    fn default() -> Self {
        Self {
            tea_cache: false,
            tea_cache_distance: DEFAULT_TEA_CACHE_DISTANCE,
            deep_cache: false,
            deep_cache_interval: DEFAULT_DEEP_CACHE_INTERVAL,
            deep_cache_branch_id: DEFAULT_DEEP_CACHE_BRANCH_ID,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AcceleratorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    tea_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tea_cache_distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deep_cache: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deep_cache_interval: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deep_cache_branch_id: Option<u32>,
}

impl AcceleratorOptions {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Sparse block holding only the members that differ from their defaults,
    /// or `None` when nothing differs.
    pub(crate) fn to_payload(&self) -> Option<AcceleratorPayload> {
        if self.is_default() {
            return None;
        }
        let defaults = Self::default();
        Some(AcceleratorPayload {
            tea_cache: self.tea_cache.then_some(true),
            tea_cache_distance: (self.tea_cache_distance != defaults.tea_cache_distance)
                .then_some(self.tea_cache_distance),
            deep_cache: self.deep_cache.then_some(true),
            deep_cache_interval: (self.deep_cache_interval != defaults.deep_cache_interval)
                .then_some(self.deep_cache_interval),
            deep_cache_branch_id: (self.deep_cache_branch_id != defaults.deep_cache_branch_id)
                .then_some(self.deep_cache_branch_id),
        })
    }
}
