//! Model definition loading.
//!
//! A model file holds one `element` table per network element, in TOML
//! (`[[element]]`) or JSON (`{"element": [...]}`). The extension picks the
//! format.

use crate::error::{IoError, Result};
use crate::serialization::{from_json, from_toml};
use regsim_core::config::DefaultsConfig;
use regsim_core::Network;
use regsim_data::ModelFile;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Toml,
    Json,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(IoError::validation(format!(
                "unsupported model file {:?}, expected .toml or .json",
                path
            ))),
        }
    }
}

/// Parses model text without building the network.
pub fn parse_model(text: &str, format: ModelFormat) -> Result<ModelFile> {
    let model: ModelFile = match format {
        ModelFormat::Toml => from_toml(text)?,
        ModelFormat::Json => from_json(text)?,
    };
    if model.elements.is_empty() {
        return Err(IoError::validation("model defines no elements"));
    }
    Ok(model)
}

/// Builds a network from model text.
pub fn network_from_str(text: &str, format: ModelFormat, defaults: &DefaultsConfig) -> Result<Network> {
    let model = parse_model(text, format)?;
    Ok(Network::from_rows(&model.elements, defaults)?)
}

/// Reads, validates and builds the network described by a model file.
pub fn load_model<P: AsRef<Path>>(path: P, defaults: &DefaultsConfig) -> Result<Network> {
    let path = path.as_ref();
    let format = ModelFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading model {:?}", path)))?;
    let network = network_from_str(&text, format, defaults)
        .map_err(|e| e.with_context(format!("loading model {:?}", path)))?;
    tracing::info!(
        path = %path.display(),
        elements = network.len(),
        updatable = network.update_list().len(),
        "Loaded model"
    );
    Ok(network)
}
