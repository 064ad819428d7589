//! # Device Catalog
//!
//! The pieces around the codec that deal in files and documents: the JSON
//! device index (brand → devices → descriptor filenames) and the full
//! command-set export.

pub mod export;
pub mod index;

pub use export::device_to_json;
pub use index::{Brand, DeviceEntry, find_brand, load};
