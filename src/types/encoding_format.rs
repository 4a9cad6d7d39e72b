//! The on-disk encoding used when a pixel array is serialized.

use crate::error::ImgcolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The supported serialization formats for pixel arrays.
///
/// A feature configured without a format stores `None`; encode then falls
/// back to PNG while the configuration keeps reporting `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EncodingFormat {
    Png,
    Jpeg,
}

impl EncodingFormat {
    pub const ALL: [EncodingFormat; 2] = [EncodingFormat::Png, EncodingFormat::Jpeg];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl FromStr for EncodingFormat {
    type Err = ImgcolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            other => Err(ImgcolError::InvalidConfiguration(format!(
                "`encoding_format` must be one of [png, jpeg] (was '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
