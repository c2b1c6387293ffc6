//! The `convert` command: GraphQL schema file in, Karate feature file out.

use crate::{ExitCode, OutputOptions};
use anyhow::Context;
use colored::Colorize;
use graphql_karate::{parse_schema, ConversionError, Converter};
use graphql_karate_config::{find_config, load_config, load_custom_scalar_mapping, KarateConfig};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Options of the `convert` command. Flags override config file values.
#[derive(Debug, Clone, Default, clap::Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ConvertArgs {
    /// GraphQL schema file (SDL)
    #[arg(value_name = "SCHEMA_FILE")]
    pub schema: PathBuf,

    /// Feature file to write [default: graphql.feature]
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output_file: Option<PathBuf>,

    /// Print the feature to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Path to a graphql-karate config file (otherwise discovered from the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Custom scalar mapping, inline (`DateTime:string,Long:number`) or a file path
    #[arg(long, value_name = "MAPPING")]
    pub custom_scalar_mapping: Option<String>,

    /// Do not generate scenarios for query operations
    #[arg(long)]
    pub exclude_queries: bool,

    /// Generate scenarios for mutation operations
    #[arg(long)]
    pub include_mutations: bool,

    /// Karate expression used as the base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Name of the query root type
    #[arg(long, value_name = "NAME")]
    pub query_name: Option<String>,

    /// Name of the mutation root type
    #[arg(long, value_name = "NAME")]
    pub mutation_name: Option<String>,

    /// Only emit schemas for these types (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "TYPES")]
    pub type_filter: Vec<String>,

    /// Only emit scenarios for these query fields (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
    pub query_operation_filter: Vec<String>,

    /// Only emit scenarios for these mutation fields (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
    pub mutation_operation_filter: Vec<String>,
}

/// A failed conversion with the exit code it maps to.
#[derive(Debug)]
pub struct Failure {
    pub code: ExitCode,
    pub error: anyhow::Error,
}

fn failure<E: Into<anyhow::Error>>(code: ExitCode) -> impl FnOnce(E) -> Failure {
    move |error| Failure {
        code,
        error: error.into(),
    }
}

/// Result of a successful conversion.
#[derive(Debug)]
pub struct Outcome {
    pub feature: String,
    /// Where the feature was written, `None` in `--stdout` mode.
    pub written_to: Option<PathBuf>,
    pub shapes: usize,
    pub scenarios: usize,
}

impl ConvertArgs {
    /// Config values given on the command line.
    fn overrides(&self) -> anyhow::Result<KarateConfig> {
        let custom_scalar_mapping = match &self.custom_scalar_mapping {
            Some(source) => load_custom_scalar_mapping(source)
                .context("Failed to load custom scalar mapping")?,
            None => BTreeMap::new(),
        };

        Ok(KarateConfig {
            output_file: self.output_file.clone(),
            query_name: self.query_name.clone(),
            mutation_name: self.mutation_name.clone(),
            exclude_queries: self.exclude_queries.then_some(true),
            include_mutations: self.include_mutations.then_some(true),
            base_url: self.base_url.clone(),
            custom_scalar_mapping,
            type_filter: self.type_filter.clone(),
            query_operation_filter: self.query_operation_filter.clone(),
            mutation_operation_filter: self.mutation_operation_filter.clone(),
        })
    }
}

/// Resolve the effective configuration: defaults, then the config file, then flags.
fn resolve_config(args: &ConvertArgs, working_dir: &Path) -> anyhow::Result<KarateConfig> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config(working_dir).context("Failed to search for config")?,
    };

    let mut config = match config_path {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => KarateConfig::default(),
    };
    config.merge(args.overrides()?);
    Ok(config)
}

/// Run a conversion without touching the process state.
#[tracing::instrument(skip(args), fields(schema = %args.schema.display()))]
pub fn execute(args: &ConvertArgs, working_dir: &Path) -> Result<Outcome, Failure> {
    let config = resolve_config(args, working_dir).map_err(failure(ExitCode::ConfigError))?;
    let settings = config
        .settings()
        .context("Invalid configuration")
        .map_err(failure(ExitCode::ConfigError))?;

    let source = fs::read_to_string(&args.schema)
        .with_context(|| format!("Failed to read schema file {}", args.schema.display()))
        .map_err(failure(ExitCode::SchemaError))?;

    let document = parse_schema(&source)
        .with_context(|| format!("Failed to parse {}", args.schema.display()))
        .map_err(failure(ExitCode::ParseError))?;

    let converter = Converter::new(settings);
    let conversion = converter
        .conversion(&document, rand::thread_rng())
        .map_err(|e| {
            let code = match e {
                ConversionError::Parse(_) => ExitCode::ParseError,
                _ => ExitCode::ConversionError,
            };
            Failure {
                code,
                error: anyhow::Error::new(e).context("Failed to convert schema"),
            }
        })?;
    let feature = conversion.feature().to_string();

    let written_to = if args.stdout {
        None
    } else {
        let path = config.output_file().to_path_buf();
        write_feature(&path, &feature).map_err(failure(ExitCode::IoError))?;
        Some(path)
    };

    Ok(Outcome {
        feature,
        written_to,
        shapes: conversion.shapes.len(),
        scenarios: conversion.scenarios.len(),
    })
}

fn write_feature(path: &Path, feature: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, feature).with_context(|| format!("Failed to write {}", path.display()))
}

/// Run the command, exiting with the mapped exit code on failure.
pub fn run(args: &ConvertArgs, output_opts: OutputOptions) -> anyhow::Result<()> {
    let working_dir = std::env::current_dir().context("Failed to read current directory")?;

    match execute(args, &working_dir) {
        Ok(outcome) => {
            match &outcome.written_to {
                None => print!("{}", outcome.feature),
                Some(path) if output_opts.show_info => println!(
                    "{} {} scenario(s) and {} schema(s) to {}",
                    "✓ Wrote".green(),
                    outcome.scenarios,
                    outcome.shapes,
                    path.display()
                ),
                Some(_) => {}
            }
            Ok(())
        }
        Err(Failure { code, error }) => {
            eprintln!("{} {:#}", "✗".red().bold(), error);
            tracing::debug!(%code, "Exiting with failure");
            code.exit();
        }
    }
}
