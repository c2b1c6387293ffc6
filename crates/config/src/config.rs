use crate::error::{ConfigError, Result};
use graphql_karate::{ConversionSettings, CustomScalarMapping, NameFilter, ScalarFamily};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Feature file written when no output file is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "graphql.feature";

/// Contents of a `graphql-karate` config file.
///
/// Every key is optional. Unset values fall back to the conversion defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KarateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_queries: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_mutations: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Custom scalar name to `string`, `number` or `boolean`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_scalar_mapping: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_filter: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_operation_filter: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutation_operation_filter: Vec<String>,
}

impl KarateConfig {
    #[must_use]
    pub fn output_file(&self) -> &Path {
        self.output_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_FILE))
    }

    /// Apply `overrides` on top of this config. Set values and non-empty
    /// collections win.
    pub fn merge(&mut self, overrides: Self) {
        fn replace<T>(target: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *target = value;
            }
        }

        replace(&mut self.output_file, overrides.output_file);
        replace(&mut self.query_name, overrides.query_name);
        replace(&mut self.mutation_name, overrides.mutation_name);
        replace(&mut self.exclude_queries, overrides.exclude_queries);
        replace(&mut self.include_mutations, overrides.include_mutations);
        replace(&mut self.base_url, overrides.base_url);

        if !overrides.custom_scalar_mapping.is_empty() {
            self.custom_scalar_mapping = overrides.custom_scalar_mapping;
        }
        if !overrides.type_filter.is_empty() {
            self.type_filter = overrides.type_filter;
        }
        if !overrides.query_operation_filter.is_empty() {
            self.query_operation_filter = overrides.query_operation_filter;
        }
        if !overrides.mutation_operation_filter.is_empty() {
            self.mutation_operation_filter = overrides.mutation_operation_filter;
        }
    }

    /// Parsed custom scalar mapping.
    pub fn custom_scalars(&self) -> Result<CustomScalarMapping> {
        self.custom_scalar_mapping
            .iter()
            .map(|(scalar, family)| {
                let family = family
                    .parse::<ScalarFamily>()
                    .map_err(|e| ConfigError::InvalidScalarMapping(format!("{scalar}: {e}")))?;
                Ok((scalar.as_str(), family))
            })
            .collect()
    }

    /// Conversion settings described by this config.
    pub fn settings(&self) -> Result<ConversionSettings> {
        let mut settings = ConversionSettings::default()
            .with_custom_scalars(self.custom_scalars()?)
            .with_type_filter(NameFilter::new(&self.type_filter))
            .with_query_operation_filter(NameFilter::new(&self.query_operation_filter))
            .with_mutation_operation_filter(NameFilter::new(&self.mutation_operation_filter))
            .with_exclude_queries(self.exclude_queries.unwrap_or(false))
            .with_include_mutations(self.include_mutations.unwrap_or(false));

        if let Some(name) = &self.query_name {
            settings = settings.with_query_name(name.as_str());
        }
        if let Some(name) = &self.mutation_name {
            settings = settings.with_mutation_name(name.as_str());
        }
        if let Some(base_url) = &self.base_url {
            settings = settings.with_base_url(base_url.as_str());
        }
        Ok(settings)
    }
}
