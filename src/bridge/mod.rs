// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` connects image features to the columnar record storage, expressed
// here as Apache Arrow. Storage only ever sees a non-nullable `Binary` column; the
// feature's configuration rides along in the field metadata as its content
// dictionary, so a reader can rebuild the adapter from the schema alone.
//
// Data Flow (Writing):
//
//   1. [image_field(name, &feature)]          -> Field { Binary, metadata: content dict }
//   2. [encode_column(&mut feature, sources)] -> BinaryArray, one encoded image per row
//
// Data Flow (Reading):
//
//   1. [feature_from_field(&field)]           -> ImageFeature (validation re-run)
//   2. [decode_column(&feature, &array)]      -> Vec<PixelArray>
//
// ====================================================================================
pub(crate) mod arrow_impl;
pub mod stateless_api;

pub use arrow_impl::{feature_from_field, image_field, FEATURE_METADATA_KEY};
pub use stateless_api::{decode_column, encode_column};
