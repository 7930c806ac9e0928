use crate::error::{RunwareError, ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares a closed enum whose serde form is the exact wire string.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RunwareError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == s)
                    .ok_or_else(|| {
                        ValidationError::UnknownVariant {
                            field: $field,
                            value: s.to_string(),
                            expected: $name::ALL
                                .iter()
                                .map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                        }
                        .into()
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// How generated images are delivered back.
    OutputType, "outputType" {
        Url => "URL",
        Base64Data => "base64Data",
        DataUri => "dataURI",
    }
}

impl Default for OutputType {
    fn default() -> Self {
        OutputType::Url
    }
}

wire_enum! {
    OutputFormat, "outputFormat" {
        Jpg => "JPG",
        Png => "PNG",
        Webp => "WEBP",
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpg
    }
}

wire_enum! {
    /// Discriminator sent as `taskType`.
    TaskType, "taskType" {
        ImageInference => "imageInference",
        PhotoMaker => "photoMaker",
        ImageUpload => "imageUpload",
        ModelUpload => "modelUpload",
    }
}

wire_enum! {
    Scheduler, "scheduler" {
        Euler => "Euler",
        EulerAncestral => "EulerAncestralDiscreteScheduler",
        FlowMatchEuler => "FlowMatch Euler",
        DpmPlusPlus => "DPM++",
        DpmPlusPlusSde => "DPM++ SDE",
        DpmPlusPlus2M => "DPM++ 2M",
        DpmPlusPlus2MSde => "DPM++ 2M SDE",
        DpmPlusPlus3M => "DPM++ 3M",
        EulerBeta => "Euler Beta",
        EulerExponential => "Euler Exponential",
        EulerKarras => "Euler Karras",
        DpmPlusPlusBeta => "DPM++ Beta",
        DpmPlusPlusExponential => "DPM++ Exponential",
        DpmPlusPlusKarras => "DPM++ Karras",
        DpmPlusPlusSdeBeta => "DPM++ SDE Beta",
        DpmPlusPlusSdeExponential => "DPM++ SDE Exponential",
        DpmPlusPlusSdeKarras => "DPM++ SDE Karras",
        DpmPlusPlus2MBeta => "DPM++ 2M Beta",
        DpmPlusPlus2MExponential => "DPM++ 2M Exponential",
        DpmPlusPlus2MKarras => "DPM++ 2M Karras",
        DpmPlusPlus2MSdeBeta => "DPM++ 2M SDE Beta",
        DpmPlusPlus2MSdeExponential => "DPM++ 2M SDE Exponential",
        DpmPlusPlus2MSdeKarras => "DPM++ 2M SDE Karras",
        DpmPlusPlus3MBeta => "DPM++ 3M Beta",
        DpmPlusPlus3MExponential => "DPM++ 3M Exponential",
        DpmPlusPlus3MKarras => "DPM++ 3M Karras",
        Ddim => "DDIM",
        Ddpm => "DDPM",
        DeisMultistep => "DEIS Multistep",
        DpmSolverSingleStep => "DPM-Solver Single-step",
        DpmSolverMultiStep => "DPM-Solver Multi-step",
        DpmSolverMultiStepInverse => "DPM-Solver Multi-step Inverse",
        EdmEuler => "EDM Euler",
        EdmDpmSolverMultiStep => "EDM DPM-Solver Multi-step",
        Heun => "Heun",
        Ipndm => "IPNDM",
        Kdpm2 => "KDPM2",
        Kdpm2Ancestral => "KDPM2 Ancestral",
        Lcm => "LCM",
        Lms => "LMS",
        Pndm => "PNDM",
        Tcd => "TCD",
        UniPc => "UniPC",
        UniPcMultistep => "UniPC Multistep",
    }
}

wire_enum! {
    /// Which signal dominates when a ControlNet guide is attached.
    ControlMode, "controlMode" {
        Prompt => "prompt",
        ControlNet => "controlnet",
        Balanced => "balanced",
    }
}

wire_enum! {
    PromptWeighting, "promptWeighting" {
        Compel => "compel",
        SdEmbeds => "sdEmbeds",
    }
}

wire_enum! {
    PhotoMakerStyle, "style" {
        NoStyle => "No style",
        Cinematic => "Cinematic",
        DisneyCharacter => "Disney Character",
        DigitalArt => "Digital Art",
        Photographic => "Photographic",
        FantasyArt => "Fantasy art",
        Neonpunk => "Neonpunk",
        Enhance => "Enhance",
        ComicBook => "Comic book",
        Lowpoly => "Lowpoly",
        LineArt => "Line art",
    }
}

impl Default for PhotoMakerStyle {
    fn default() -> Self {
        PhotoMakerStyle::Photographic
    }
}

wire_enum! {
    ModelCategory, "category" {
        Checkpoint => "checkpoint",
        Lora => "lora",
        ControlNet => "controlnet",
    }
}
