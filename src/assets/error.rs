use thiserror::Error;

use super::AssetKind;

/// Failure to load a card asset. Always recovered by the card itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("failed to load {kind} for {id}: {reason}")]
    Failed {
        kind: AssetKind,
        id: String,
        reason: String,
    },
    #[error("asset queue shut down before the request completed")]
    Cancelled,
}

impl AssetError {
    pub fn failed(kind: AssetKind, id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            id: id.into(),
            reason: reason.into(),
        }
    }
}
