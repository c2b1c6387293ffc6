use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Failures that abort a conversion. No partial output is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unrecognized type reference shape: {0}")]
    UnrecognizedTypeShape(String),

    #[error("Unknown type '{name}': not a built-in scalar or a declared type")]
    UnknownNamedType { name: String },

    #[error("Enum '{name}' has no values to pick an example from")]
    MissingEnumValues { name: String },

    #[error("Failed to parse schema: {0}")]
    Parse(String),
}
