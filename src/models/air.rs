use crate::error::{RunwareError, ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Opaque model reference of the form `namespace:id@version`.
///
/// The version suffix is optional (`runware:default` is accepted). The catalog
/// on the remote side changes independently of this client, so any
/// well-formed identifier is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelAir(String);

impl ModelAir {
    pub fn parse(value: &str) -> Result<Self, RunwareError> {
        let invalid = || RunwareError::from(ValidationError::InvalidAir(value.to_string()));

        if value.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (namespace, rest) = value.split_once(':').ok_or_else(invalid)?;
        let (id, version) = match rest.split_once('@') {
            Some((id, version)) => (id, Some(version)),
            None => (rest, None),
        };
        if namespace.is_empty() || id.is_empty() || id.contains(':') {
            return Err(invalid());
        }
        if let Some(version) = version {
            if version.is_empty() || version.contains('@') {
                return Err(invalid());
            }
        }
        Ok(ModelAir(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    pub fn version(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, version)| version)
    }
}

impl fmt::Display for ModelAir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelAir {
    type Err = RunwareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelAir::parse(s)
    }
}

impl TryFrom<&str> for ModelAir {
    type Error = RunwareError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ModelAir::parse(value)
    }
}

impl Serialize for ModelAir {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModelAir {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ModelAir::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Models commonly used with the API, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownModel {
    Flux,
    PonyDiffusion,
    PonyV6,
    PonyRealism,
    PonyRealism22,
    RealDreamSdxlPony15,
    VolendirPonyCinematic,
    StellaratorMix,
    GoddessOfRealism,
    RealismByStableYogi,
    CyberrealisticPonyV8,
    HassakuXlIllustrious,
    IllustriousXl,
    AutismMix,
    PhotoMakerSdxl,
    SeedDream45,
}

impl KnownModel {
    pub fn air_str(&self) -> &'static str {
        match self {
            KnownModel::Flux => "civitai:618692@691639",
            KnownModel::PonyDiffusion => "runware:101@1",
            KnownModel::PonyV6 => "civitai:257749@298112",
            KnownModel::PonyRealism => "civitai:372465@534642",
            KnownModel::PonyRealism22 => "civitai:372465@914390",
            KnownModel::RealDreamSdxlPony15 => "civitai:153568@1376263",
            KnownModel::VolendirPonyCinematic => "civitai:723371@812199",
            KnownModel::StellaratorMix => "civitai:980168@1233636",
            KnownModel::GoddessOfRealism => "civitai:212737@714766",
            KnownModel::RealismByStableYogi => "civitai:166609@775007",
            KnownModel::CyberrealisticPonyV8 => "civitai:443821@1346181",
            KnownModel::HassakuXlIllustrious => "civitai:140272@325904",
            KnownModel::IllustriousXl => "x:42@889818",
            KnownModel::AutismMix => "civitai:288584@324524",
            KnownModel::PhotoMakerSdxl => "civitai:133005@288982",
            KnownModel::SeedDream45 => "bytedance:seedream@4.5",
        }
    }

    pub fn air(&self) -> ModelAir {
        ModelAir(self.air_str().to_string())
    }
}

impl From<KnownModel> for ModelAir {
    fn from(model: KnownModel) -> Self {
        model.air()
    }
}

/// IP-Adapter model identifiers.
pub mod ip_adapter {
    pub const SDXL: &str = "runware:55@1";
    pub const SDXL_PLUS: &str = "runware:55@2";
    pub const SDXL_PLUS_FACE: &str = "runware:55@3";
    pub const SDXL_VIT_H: &str = "runware:55@4";
    pub const SD_1_5: &str = "runware:55@5";
    pub const SD_1_5_PLUS: &str = "runware:55@6";
    pub const SD_1_5_LIGHT: &str = "runware:55@7";
    pub const SD_1_5_PLUS_FACE: &str = "runware:55@8";
    pub const SD_1_5_VIT_G: &str = "runware:55@10";
}
