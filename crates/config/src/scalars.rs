//! Custom scalar mapping sources.
//!
//! A mapping is given either inline as `Name:family` pairs separated by
//! commas, or as the path of a file holding the same text or a JSON object.

use crate::{ConfigError, Result};
use graphql_karate::ScalarFamily;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse an inline mapping such as `DateTime:string, Long:number`.
///
/// Families are validated and normalized to lowercase. Blank entries are skipped.
pub fn parse_custom_scalar_mapping(text: &str) -> Result<BTreeMap<String, String>> {
    let mut mapping = BTreeMap::new();

    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((scalar, family)) = entry.split_once(':') else {
            return Err(ConfigError::InvalidScalarMapping(format!(
                "expected 'Name:family', found '{entry}'"
            )));
        };
        insert_entry(&mut mapping, scalar, family)?;
    }

    if mapping.is_empty() {
        return Err(ConfigError::InvalidScalarMapping(
            "mapping has no entries".to_string(),
        ));
    }
    Ok(mapping)
}

/// Load a mapping from `source`, which is a file path when such a file
/// exists and inline mapping text otherwise.
#[tracing::instrument]
pub fn load_custom_scalar_mapping(source: &str) -> Result<BTreeMap<String, String>> {
    let path = Path::new(source);
    if !path.is_file() {
        tracing::debug!("Parsing inline custom scalar mapping");
        return parse_custom_scalar_mapping(source);
    }

    tracing::debug!(path = %path.display(), "Reading custom scalar mapping file");
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Err(ConfigError::InvalidScalarMapping(format!(
            "{} is empty",
            path.display()
        )));
    }

    if contents.trim_start().starts_with('{') {
        let raw: BTreeMap<String, String> = serde_json::from_str(&contents).map_err(|e| {
            ConfigError::InvalidScalarMapping(format!("{}: {e}", path.display()))
        })?;
        let mut mapping = BTreeMap::new();
        for (scalar, family) in &raw {
            insert_entry(&mut mapping, scalar, family)?;
        }
        return Ok(mapping);
    }

    parse_custom_scalar_mapping(&contents)
}

fn insert_entry(mapping: &mut BTreeMap<String, String>, scalar: &str, family: &str) -> Result<()> {
    let scalar = scalar.trim();
    if scalar.is_empty() {
        return Err(ConfigError::InvalidScalarMapping(
            "empty scalar name".to_string(),
        ));
    }
    let family = family
        .parse::<ScalarFamily>()
        .map_err(|e| ConfigError::InvalidScalarMapping(format!("{scalar}: {e}")))?;

    if mapping
        .insert(scalar.to_string(), family.as_str().to_string())
        .is_some()
    {
        tracing::warn!(scalar, "Custom scalar mapped more than once, last entry wins");
    }
    Ok(())
}
