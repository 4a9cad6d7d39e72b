//! False-color rendering of single-channel images for display.
//!
//! Values are stretched to [0, 1] by the frame's own min/max and mapped
//! through a rainbow hue ramp running from red (low) to magenta (high).

use image::{Rgb, RgbImage};
use ndarray::{ArrayViewD, Axis};
use num_traits::ToPrimitive;

use crate::codec::encode::hwc;
use crate::error::ImgcolError;
use crate::types::PixelArray;

/// Hue of the highest value, in degrees.
const MAX_HUE: f32 = 300.0;

/// Maps channel 0 of a `(h, w, c)` frame to RGB.
pub fn apply_colormap(frame: &PixelArray) -> Result<RgbImage, ImgcolError> {
    let (height, width, channels) = hwc(frame.shape())?;
    if channels == 0 {
        return Err(ImgcolError::UnsupportedInput(
            "cannot apply a colormap to an image without channels".to_string(),
        ));
    }
    let values = match frame {
        PixelArray::UInt8(a) => first_channel_as_f32(a.view()),
        PixelArray::UInt16(a) => first_channel_as_f32(a.view()),
    };

    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    let mut out = RgbImage::new(width, height);
    for (pixel, &v) in out.pixels_mut().zip(values.iter()) {
        let t = if range > 0.0 { (v - min) / range } else { 0.0 };
        *pixel = Rgb(rainbow(t));
    }
    Ok(out)
}

fn first_channel_as_f32<T: ToPrimitive + Copy>(array: ArrayViewD<'_, T>) -> Vec<f32> {
    let last = Axis(array.ndim() - 1);
    array
        .index_axis(last, 0)
        .iter()
        .map(|v| v.to_f32().unwrap_or(0.0))
        .collect()
}

/// Full-saturation, full-value HSV color for `t` in [0, 1].
fn rainbow(t: f32) -> [u8; 3] {
    let hue = t.clamp(0.0, 1.0) * MAX_HUE / 60.0;
    let sector = hue.floor();
    let frac = hue - sector;
    let (r, g, b) = match sector as u32 {
        0 => (1.0, frac, 0.0),
        1 => (1.0 - frac, 1.0, 0.0),
        2 => (0.0, 1.0, frac),
        3 => (0.0, 1.0 - frac, 1.0),
        4 => (frac, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - frac),
    };
    let to_u8 = |c: f32| (c * 255.0).round() as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}
