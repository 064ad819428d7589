//! Device index loading.
//!
//! The index is a JSON catalog shipped alongside the descriptor files:
//!
//! ```json
//! [
//!   {
//!     "brand_name": "FrostCo",
//!     "devices": [
//!       { "device_name": "FC-2000", "bin": "frostco_fc2000.bin" }
//!     ]
//!   }
//! ]
//! ```
//!
//! Setup workflows list brands, then a brand's devices, then load the
//! chosen device's descriptor file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// One brand and its devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "brand_name")]
    pub name: String,
    pub devices: Vec<DeviceEntry>,
}

/// One device: a display name and its descriptor filename, relative to
/// the index file's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    #[serde(rename = "device_name")]
    pub name: String,
    pub bin: String,
}

/// Load and validate the device index.
pub fn load(path: &Path) -> Result<Vec<Brand>, IndexError> {
    if !path.exists() {
        return Err(IndexError::NotFound(path.to_owned()));
    }
    let text = fs::read_to_string(path)?;
    let brands: Vec<Brand> = serde_json::from_str(&text)?;
    if brands.is_empty() {
        return Err(IndexError::Empty);
    }
    Ok(brands)
}

/// Find a brand by name.
pub fn find_brand<'a>(brands: &'a [Brand], name: &str) -> Result<&'a Brand, IndexError> {
    brands
        .iter()
        .find(|brand| brand.name == name)
        .ok_or_else(|| IndexError::UnknownBrand(name.to_owned()))
}
