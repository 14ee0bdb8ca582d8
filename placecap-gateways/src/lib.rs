pub mod geocoding;
pub mod json_store;
pub mod map_preview;
