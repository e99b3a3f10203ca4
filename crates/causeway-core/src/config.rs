//! Codec configuration.

use serde::{Deserialize, Serialize};

use crate::chain::MAX_CHAIN_DEPTH;
use crate::codec::CodecError;
use crate::stack::StackFilter;

/// Settings shared by codec implementations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum chain length produced or consumed (values below 1 act as 1).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Frames removed from stacks on serialization.
    #[serde(default)]
    pub stack_filter: StackFilter,
}

fn default_max_depth() -> usize {
    MAX_CHAIN_DEPTH
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_CHAIN_DEPTH,
            stack_filter: StackFilter::default(),
        }
    }
}

impl CodecConfig {
    /// Load from a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_document() {
        let c = CodecConfig::from_json("{}").unwrap();
        assert_eq!(c, CodecConfig::default());
        assert_eq!(c.effective_max_depth(), 10);
    }

    #[test]
    fn zero_depth_is_clamped() {
        let c = CodecConfig::from_json(r#"{"max_depth": 0}"#).unwrap();
        assert_eq!(c.effective_max_depth(), 1);
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(matches!(
            CodecConfig::from_json("{"),
            Err(CodecError::InvalidJson(_))
        ));
    }
}
