use crate::{ConfigError, KarateConfig, Result};
use graphql_karate::ScalarFamily;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".graphql-karate.yml",
    ".graphql-karate.yaml",
    ".graphql-karate.json",
    "graphql-karate.config.yml",
    "graphql-karate.config.yaml",
    "graphql-karate.config.json",
];

/// Find a config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a config from the specified path.
/// The format is picked from the file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<KarateConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        custom_scalars = config.custom_scalar_mapping.len(),
        include_mutations = config.include_mutations.unwrap_or(false),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<KarateConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    tracing::debug!(extension, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => {
            tracing::trace!("Parsing as YAML");
            parse_yaml(contents, path)?
        }
        "json" => {
            tracing::trace!("Parsing as JSON");
            parse_json(contents, path)?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!("Validating config");
    validate_config(&config, path)?;

    Ok(config)
}

/// Parse YAML configuration
fn parse_yaml(contents: &str, path: &Path) -> Result<KarateConfig> {
    if contents.trim().is_empty() {
        return Ok(KarateConfig::default());
    }
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

/// Parse JSON configuration
fn parse_json(contents: &str, path: &Path) -> Result<KarateConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

/// Validate the loaded configuration
#[tracing::instrument(skip(config, path), fields(path = %path.display()))]
fn validate_config(config: &KarateConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    for (key, value) in [
        ("queryName", &config.query_name),
        ("mutationName", &config.mutation_name),
        ("baseUrl", &config.base_url),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(invalid(format!("'{key}' must not be empty")));
        }
    }

    if config
        .output_file
        .as_ref()
        .is_some_and(|file| file.as_os_str().is_empty())
    {
        return Err(invalid("'outputFile' must not be empty".to_string()));
    }

    for (scalar, family) in &config.custom_scalar_mapping {
        if scalar.trim().is_empty() {
            return Err(invalid(
                "'customScalarMapping' has an empty scalar name".to_string(),
            ));
        }
        if let Err(e) = family.parse::<ScalarFamily>() {
            return Err(invalid(format!("'customScalarMapping.{scalar}': {e}")));
        }
    }

    for (key, names) in [
        ("typeFilter", &config.type_filter),
        ("queryOperationFilter", &config.query_operation_filter),
        ("mutationOperationFilter", &config.mutation_operation_filter),
    ] {
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(invalid(format!("'{key}' has an empty entry")));
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
