//! The in-memory, decoded representation of an image (or a stack of frames).

use crate::error::ImgcolError;
use crate::types::ImageDType;
use ndarray::{Array, ArrayD, ArrayViewD, Axis, Dimension, IxDyn};

/// A decoded pixel array of one of the supported element types.
///
/// Layout is `(height, width, channels)` for a single image and
/// `(frames, height, width, channels)` for a frame sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelArray {
    UInt8(ArrayD<u8>),
    UInt16(ArrayD<u16>),
}

impl PixelArray {
    /// An all-zero array of the given shape and dtype.
    pub fn zeros(shape: &[usize], dtype: ImageDType) -> Self {
        match dtype {
            ImageDType::UInt8 => Self::UInt8(ArrayD::zeros(IxDyn(shape))),
            ImageDType::UInt16 => Self::UInt16(ArrayD::zeros(IxDyn(shape))),
        }
    }

    /// Builds an array from row-major interleaved samples.
    pub(crate) fn from_u8_samples(shape: &[usize], samples: Vec<u8>) -> Result<Self, ImgcolError> {
        Ok(Self::UInt8(ArrayD::from_shape_vec(IxDyn(shape), samples)?))
    }

    pub(crate) fn from_u16_samples(shape: &[usize], samples: Vec<u16>) -> Result<Self, ImgcolError> {
        Ok(Self::UInt16(ArrayD::from_shape_vec(IxDyn(shape), samples)?))
    }

    pub fn dtype(&self) -> ImageDType {
        match self {
            Self::UInt8(_) => ImageDType::UInt8,
            Self::UInt16(_) => ImageDType::UInt16,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::UInt8(a) => a.shape(),
            Self::UInt16(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// The leading-axis length: number of frames for a rank-4 array.
    pub fn len_of_first_axis(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// Extracts entry `index` along the first axis, e.g. one frame of a
    /// `(frames, h, w, c)` stack. `(1, h, w, c)` squeezed this way gives
    /// `(h, w, c)`.
    pub fn frame(&self, index: usize) -> Result<PixelArray, ImgcolError> {
        if self.ndim() == 0 || index >= self.len_of_first_axis() {
            return Err(ImgcolError::UnsupportedInput(format!(
                "frame index {} out of range for array of shape {:?}",
                index,
                self.shape()
            )));
        }
        Ok(match self {
            Self::UInt8(a) => Self::UInt8(a.index_axis(Axis(0), index).to_owned()),
            Self::UInt16(a) => Self::UInt16(a.index_axis(Axis(0), index).to_owned()),
        })
    }

    /// Row-major samples as raw bytes (native endian for 16-bit data).
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        match self {
            Self::UInt8(a) => a.iter().copied().collect(),
            Self::UInt16(a) => {
                let samples: Vec<u16> = a.iter().copied().collect();
                bytemuck::cast_slice::<u16, u8>(&samples).to_vec()
            }
        }
    }

    /// Reassembles an array from native-endian row-major bytes.
    pub fn from_ne_bytes(shape: &[usize], dtype: ImageDType, bytes: &[u8]) -> Result<Self, ImgcolError> {
        let expected = shape
            .iter()
            .try_fold(dtype.byte_width(), |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                ImgcolError::UnsupportedInput(format!(
                    "shape {:?} ({}) is too large to address",
                    shape, dtype
                ))
            })?;
        if bytes.len() != expected {
            return Err(ImgcolError::UnsupportedInput(format!(
                "expected {} bytes for shape {:?} ({}), got {}",
                expected,
                shape,
                dtype,
                bytes.len()
            )));
        }
        match dtype {
            ImageDType::UInt8 => Self::from_u8_samples(shape, bytes.to_vec()),
            ImageDType::UInt16 => {
                // `bytes` may not be 2-byte aligned, so no zero-copy cast here.
                let samples: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                    .collect();
                Self::from_u16_samples(shape, samples)
            }
        }
    }

    pub fn as_u8(&self) -> Option<ArrayViewD<'_, u8>> {
        match self {
            Self::UInt8(a) => Some(a.view()),
            Self::UInt16(_) => None,
        }
    }

    pub fn as_u16(&self) -> Option<ArrayViewD<'_, u16>> {
        match self {
            Self::UInt16(a) => Some(a.view()),
            Self::UInt8(_) => None,
        }
    }
}

impl<D: Dimension> From<Array<u8, D>> for PixelArray {
    fn from(array: Array<u8, D>) -> Self {
        Self::UInt8(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<u16, D>> for PixelArray {
    fn from(array: Array<u16, D>) -> Self {
        Self::UInt16(array.into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};

    #[test]
    fn test_dtype_and_shape_follow_variant() {
        let arr = PixelArray::from(Array3::<u16>::zeros((2, 5, 1)));
        assert_eq!(arr.dtype(), ImageDType::UInt16);
        assert_eq!(arr.shape(), &[2, 5, 1]);
    }

    #[test]
    fn test_frame_squeezes_leading_axis() {
        let mut stack = Array4::<u8>::zeros((3, 2, 2, 3));
        stack[[1, 0, 0, 0]] = 9;
        let arr = PixelArray::from(stack);

        let frame = arr.frame(1).unwrap();
        assert_eq!(frame.shape(), &[2, 2, 3]);
        assert_eq!(frame.as_u8().unwrap()[[0, 0, 0]], 9);
        assert!(arr.frame(3).is_err());
    }

    #[test]
    fn test_ne_bytes_roundtrip_u16() {
        let mut img = Array3::<u16>::zeros((1, 2, 1));
        img[[0, 1, 0]] = 0xABCD;
        let arr = PixelArray::from(img);
        let bytes = arr.to_ne_bytes();
        assert_eq!(bytes.len(), 4);
        let back = PixelArray::from_ne_bytes(&[1, 2, 1], ImageDType::UInt16, &bytes).unwrap();
        assert_eq!(back, arr);
    }

    #[test]
    fn test_from_ne_bytes_rejects_overflowing_shape() {
        let result = PixelArray::from_ne_bytes(&[usize::MAX, 2, 1], ImageDType::UInt16, &[0u8; 4]);
        assert!(matches!(result, Err(ImgcolError::UnsupportedInput(_))));
    }

    #[test]
    fn test_from_ne_bytes_rejects_wrong_length() {
        let result = PixelArray::from_ne_bytes(&[2, 2, 3], ImageDType::UInt8, &[0u8; 5]);
        assert!(matches!(result, Err(ImgcolError::UnsupportedInput(_))));
    }
}
