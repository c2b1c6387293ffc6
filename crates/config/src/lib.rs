//! User configuration for `graphql-karate`.
//!
//! A config file is discovered by walking up from the working directory
//! (see [`find_config`]) and is written in YAML or JSON:
//!
//! ```yaml
//! outputFile: tests/graphql.feature
//! baseUrl: https://api.example.com
//! includeMutations: true
//! customScalarMapping:
//!   DateTime: string
//!   Long: number
//! typeFilter: [User, Post]
//! ```

mod config;
mod error;
mod loader;
mod scalars;

pub use config::{KarateConfig, DEFAULT_OUTPUT_FILE};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
pub use scalars::{load_custom_scalar_mapping, parse_custom_scalar_mapping};
