// In: src/bridge/stateless_api.rs

use arrow::array::{Array, BinaryArray, BinaryBuilder};

use crate::error::ImgcolError;
use crate::feature::{ImageFeature, ImageSource};
use crate::types::PixelArray;

/// Encodes every source into one row of a `BinaryArray`.
/// Stops at the first source that fails to encode.
pub fn encode_column<I, S>(feature: &mut ImageFeature, sources: I) -> Result<BinaryArray, ImgcolError>
where
    I: IntoIterator<Item = S>,
    S: Into<ImageSource>,
{
    let mut builder = BinaryBuilder::new();
    for source in sources {
        let encoded = feature.encode(source)?;
        builder.append_value(&encoded);
    }
    Ok(builder.finish())
}

/// Decodes every row of a `BinaryArray` written by [`encode_column`].
pub fn decode_column(feature: &ImageFeature, array: &BinaryArray) -> Result<Vec<PixelArray>, ImgcolError> {
    (0..array.len())
        .map(|row| {
            if array.is_null(row) {
                return Err(ImgcolError::DecodeError(format!(
                    "row {} is null; image columns are not nullable",
                    row
                )));
            }
            feature.decode(array.value(row))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_encode_then_decode_column() {
        // 1. Arrange: a default feature and a mix of sources.
        let mut feature = ImageFeature::new(None, None, None, false).unwrap();
        let red = PixelArray::from(Array3::<u8>::from_shape_fn((3, 4, 3), |(_, _, c)| {
            if c == 0 { 255 } else { 0 }
        }));
        let pre_encoded = feature.encode(red.clone()).unwrap();
        let sources = vec![ImageSource::from(red.clone()), ImageSource::from(pre_encoded)];

        // 2. Act
        let column = encode_column(&mut feature, sources).unwrap();
        let decoded = decode_column(&feature, &column).unwrap();

        // 3. Assert
        assert_eq!(column.len(), 2);
        assert_eq!(column.null_count(), 0);
        assert_eq!(decoded, vec![red.clone(), red]);
    }

    #[test]
    fn test_null_rows_are_rejected() {
        let feature = ImageFeature::new(None, None, None, false).unwrap();
        let array = BinaryArray::from(vec![None::<&[u8]>]);
        assert!(matches!(
            decode_column(&feature, &array),
            Err(ImgcolError::DecodeError(_))
        ));
    }
}
