//! Error type for the configuration adapters.

use jsonc_splice::SpliceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A structural edit failed; fatal for the file being patched.
    #[error(transparent)]
    Splice(#[from] SpliceError),
    /// A section of the parsed snapshot does not have the shape its model
    /// expects.
    #[error("INVALID_SECTION: \"{key}\": {source}")]
    InvalidSection {
        key: &'static str,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_errors_pass_through_unchanged() {
        let inner = SpliceError::UnterminatedLiteral;
        let wrapped = ConfigError::from(inner.clone());
        assert_eq!(wrapped.to_string(), inner.to_string());
    }
}
