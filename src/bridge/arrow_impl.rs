// In: src/bridge/arrow_impl.rs

//! Schema-level glue between `ImageFeature` and Arrow fields.

use std::collections::HashMap;

use arrow::datatypes::Field;

use crate::error::ImgcolError;
use crate::feature::{ContentDict, ImageFeature};

/// Field metadata key holding the feature's content dictionary as JSON.
pub const FEATURE_METADATA_KEY: &str = "imgcol.image_feature";

/// Declares the storage column for `feature`: one non-nullable opaque byte
/// string per record, annotated with the feature configuration.
pub fn image_field(name: &str, feature: &ImageFeature) -> Result<Field, ImgcolError> {
    let serialized = feature.serialized_spec();
    let content = feature.to_content_dict().to_json()?;
    let metadata = HashMap::from([(FEATURE_METADATA_KEY.to_string(), content)]);
    Ok(Field::new(name, serialized.data_type, false).with_metadata(metadata))
}

/// Rebuilds the feature that produced `field`.
pub fn feature_from_field(field: &Field) -> Result<ImageFeature, ImgcolError> {
    let json = field.metadata().get(FEATURE_METADATA_KEY).ok_or_else(|| {
        ImgcolError::InvalidConfiguration(format!(
            "field '{}' carries no '{}' metadata",
            field.name(),
            FEATURE_METADATA_KEY
        ))
    })?;
    ImageFeature::from_content_dict(ContentDict::from_json(json)?)
}
