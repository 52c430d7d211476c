/// Source decoding and rasterization.
pub mod decode;
