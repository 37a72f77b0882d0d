//! Error taxonomy for the slot engine.
//!
//! Callers should treat the variants as three categories:
//! - [`SlotError::NotFound`]: the referenced slot does not exist; the
//!   caller decides whether that is user error or a generation gap.
//! - [`SlotError::PreconditionFailed`]: the slot's state changed since it
//!   was last read (a lost race); re-fetch and retry, or surface the
//!   conflict to the user.
//! - everything else: the store itself is unavailable or corrupt. These
//!   are propagated as-is; the engine never retries internally.

use crate::slot::{SlotKey, SlotStatus};

#[derive(Debug, thiserror::Error)]
pub enum SlotError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no slot exists at {key}")]
    NotFound { key: SlotKey },
    #[error("slot {key} is {actual}, expected {expected}")]
    PreconditionFailed {
        key: SlotKey,
        expected: SlotStatus,
        actual: SlotStatus,
    },
    #[error("slot store unavailable: {0}")]
    StoreUnavailable(Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read slot ledger: {0}")]
    LedgerRead(std::io::Error),
    #[error("failed to write slot ledger: {0}")]
    LedgerWrite(std::io::Error),
    #[error("failed to serialize slot ledger: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize slot ledger: {0}")]
    Deserialization(serde_json::Error),
}

pub type SlotResult<T> = std::result::Result<T, SlotError>;
