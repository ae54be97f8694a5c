pub mod client;
pub mod download;
pub mod image_cache;
pub mod wire;
