//! Thumbnail creation for HTML previews.

use image::DynamicImage;

use crate::codec::encode::to_dynamic_image;
use crate::error::ImgcolError;
use crate::preview::colormap::apply_colormap;
use crate::types::PixelArray;

/// Builds an 8-bit display image from a `(h, w, c)` frame, shrunk so that its
/// longest side is at most `max_size` (aspect ratio kept, never enlarged).
pub fn create_thumbnail(
    frame: &PixelArray,
    use_colormap: bool,
    max_size: u32,
) -> Result<DynamicImage, ImgcolError> {
    // Colormap first: it changes channels and dtype.
    let image = if use_colormap {
        DynamicImage::ImageRgb8(apply_colormap(frame)?)
    } else {
        to_8bit(to_dynamic_image(frame)?)
    };
    Ok(shrink_to_fit(image, max_size))
}

fn to_8bit(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(image.to_luma8()),
        DynamicImage::ImageLumaA16(_) => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        DynamicImage::ImageRgb16(_) => DynamicImage::ImageRgb8(image.to_rgb8()),
        DynamicImage::ImageRgba16(_) => DynamicImage::ImageRgba8(image.to_rgba8()),
        other => other,
    }
}

fn shrink_to_fit(image: DynamicImage, max_size: u32) -> DynamicImage {
    if image.width() <= max_size && image.height() <= max_size {
        return image;
    }
    image.thumbnail(max_size, max_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_large_image_is_shrunk_with_aspect() {
        let frame = PixelArray::from(Array3::<u8>::zeros((256, 512, 3)));
        let thumb = create_thumbnail(&frame, false, 128).unwrap();
        assert_eq!(thumb.width(), 128);
        assert_eq!(thumb.height(), 64);
    }

    #[test]
    fn test_small_image_is_not_enlarged() {
        let frame = PixelArray::from(Array3::<u8>::zeros((10, 20, 1)));
        let thumb = create_thumbnail(&frame, false, 128).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (20, 10));
    }

    #[test]
    fn test_sixteen_bit_reduced_to_eight() {
        let frame = PixelArray::from(Array3::<u16>::from_elem((4, 4, 3), u16::MAX));
        let thumb = create_thumbnail(&frame, false, 128).unwrap();
        assert!(matches!(thumb, DynamicImage::ImageRgb8(_)));
        assert_eq!(thumb.to_rgb8().get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_colormap_yields_rgb() {
        let frame = PixelArray::from(Array3::<u8>::zeros((4, 4, 1)));
        let thumb = create_thumbnail(&frame, true, 128).unwrap();
        assert!(matches!(thumb, DynamicImage::ImageRgb8(_)));
    }
}
