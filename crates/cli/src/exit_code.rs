//! Exit codes for the `graphql-karate` CLI.
//!
//! Scripts and CI jobs can tell failure modes apart by the process status.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Feature file generated
    Success = 0,
    /// The schema could not be converted (unknown type, empty enum, ...)
    ConversionError = 1,
    /// Configuration error (unreadable or invalid config, bad scalar mapping)
    ConfigError = 2,
    /// Schema file could not be read
    SchemaError = 3,
    /// Feature file could not be written
    IoError = 4,
    /// Invalid GraphQL syntax in the schema
    ParseError = 5,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ConversionError => write!(f, "conversion error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema load error"),
            Self::IoError => write!(f, "I/O error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ExitCode::Success,
            ExitCode::ConversionError,
            ExitCode::ConfigError,
            ExitCode::SchemaError,
            ExitCode::IoError,
            ExitCode::ParseError,
        ]
        .map(ExitCode::code);
        assert_eq!(codes, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ParseError.to_string(), "parse error");
        assert_eq!(ExitCode::ConfigError.to_string(), "configuration error");
    }
}
