use serde::{Deserialize, Serialize};

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of constructed nodes before decoding is rejected
    pub max_depth: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}
