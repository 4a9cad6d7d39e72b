//! This module defines the core, strongly-typed data representations used
//! throughout the image feature adapter.
//!
//! It includes the closed `ImageDType` and `EncodingFormat` enums which replace
//! string-based descriptors, the wildcard-aware `Shape`, and the decoded
//! `PixelArray`.

pub mod encoding_format;
pub mod image_dtype;
pub mod pixel_array;
pub mod shape;

// Re-export the main type(s) for easier access.
pub use encoding_format::EncodingFormat;
pub use image_dtype::ImageDType;
pub use pixel_array::PixelArray;
pub use shape::Shape;
