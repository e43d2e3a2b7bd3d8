use serde::{Deserialize, Serialize};

use crate::types::ImuError;

/// What the sequence does with a payload that fails schema decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Yield the error and stop.
    #[default]
    Strict,
    /// Record the error, log it and continue with the next packet.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeConfig {
    pub mode: DecodeMode,

    /// Lenient mode only: abort once more than this many packets were
    /// skipped. `None` means unlimited.
    pub max_skipped: Option<usize>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            mode: DecodeMode::Strict,
            max_skipped: None,
        }
    }
}

impl DecodeConfig {
    pub fn new(mode: Option<DecodeMode>, max_skipped: Option<usize>) -> Self {
        Self {
            mode: mode.unwrap_or_default(),
            max_skipped,
        }
    }

    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self { mode: DecodeMode::Lenient, max_skipped: None }
    }

    pub fn lenient_with_budget(max_skipped: usize) -> Self {
        Self { mode: DecodeMode::Lenient, max_skipped: Some(max_skipped) }
    }

    pub fn is_lenient(&self) -> bool {
        self.mode == DecodeMode::Lenient
    }

    /// A skip budget only makes sense when packets can be skipped.
    pub fn validate(&self) -> Result<(), ImuError> {
        if self.mode == DecodeMode::Strict && self.max_skipped.is_some() {
            return Err(ImuError::Validation(
                "max_skipped requires lenient decode mode".into(),
            ));
        }
        Ok(())
    }
}
