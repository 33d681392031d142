use checklog::Sample;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("couldn't read samples file: {0}")]
    Io(#[from] std::io::Error),
    #[error("couldn't parse samples file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads a JSON array of samples, in any order.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, SeedError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
