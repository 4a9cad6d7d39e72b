//! This module defines the canonical, type-safe representation of the pixel
//! element types an image column can hold.

use crate::error::ImgcolError;
use arrow::datatypes::DataType as ArrowDataType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of pixel element types supported by image columns.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ImageDType {
    #[default]
    UInt8,
    UInt16,
}

impl ImageDType {
    /// The canonical name persisted in content dictionaries.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
        }
    }

    /// Size of one pixel component in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::UInt8 => 1,
            Self::UInt16 => 2,
        }
    }

    /// Converts an Arrow `DataType` into an `ImageDType`.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, ImgcolError> {
        match arrow_type {
            ArrowDataType::UInt8 => Ok(Self::UInt8),
            ArrowDataType::UInt16 => Ok(Self::UInt16),
            dt => Err(ImgcolError::InvalidConfiguration(format!(
                "Cannot convert Arrow type {:?} to an image dtype",
                dt
            ))),
        }
    }

    /// Converts an `ImageDType` back into an Arrow `DataType`.
    pub fn to_arrow_type(&self) -> ArrowDataType {
        match self {
            Self::UInt8 => ArrowDataType::UInt8,
            Self::UInt16 => ArrowDataType::UInt16,
        }
    }
}

impl FromStr for ImageDType {
    type Err = ImgcolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" => Ok(Self::UInt8),
            "uint16" => Ok(Self::UInt16),
            other => Err(ImgcolError::InvalidConfiguration(format!(
                "Unsupported image dtype '{}'. Must be one of: uint8, uint16",
                other
            ))),
        }
    }
}

/// Provides the canonical string representation for an `ImageDType`.
impl fmt::Display for ImageDType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // These names are part of the persisted content dictionary contract.
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_parse_roundtrip() {
        for dtype in [ImageDType::UInt8, ImageDType::UInt16] {
            assert_eq!(dtype.name().parse::<ImageDType>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_unknown_name_is_invalid_configuration() {
        let err = "float32".parse::<ImageDType>().unwrap_err();
        assert!(matches!(err, ImgcolError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_arrow_mapping() {
        assert_eq!(ImageDType::UInt16.to_arrow_type(), ArrowDataType::UInt16);
        assert_eq!(
            ImageDType::from_arrow_type(&ArrowDataType::UInt8).unwrap(),
            ImageDType::UInt8
        );
        assert!(ImageDType::from_arrow_type(&ArrowDataType::Int32).is_err());
    }
}
