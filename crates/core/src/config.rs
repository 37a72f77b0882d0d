//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! services. Nothing in the engine reads environment variables during an
//! operation; that keeps behaviour consistent across multi-threaded
//! callers and test harnesses.

use crate::error::{SlotError, SlotResult};
use crate::template::SlotTemplate;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
///
/// The data directory is only consulted by file-backed stores; in-memory
/// embeddings may point it anywhere.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    slot_data_dir: PathBuf,
    template: SlotTemplate,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(slot_data_dir: PathBuf, template: SlotTemplate) -> SlotResult<Self> {
        if slot_data_dir.as_os_str().is_empty() {
            return Err(SlotError::InvalidInput(
                "slot_data_dir cannot be empty".into(),
            ));
        }

        Ok(Self {
            slot_data_dir,
            template,
        })
    }

    pub fn slot_data_dir(&self) -> &Path {
        &self.slot_data_dir
    }

    pub fn template(&self) -> &SlotTemplate {
        &self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new(), SlotTemplate::standard())
            .expect_err("should reject empty path");
        assert!(matches!(err, SlotError::InvalidInput(_)));
    }

    #[test]
    fn exposes_resolved_values() {
        let cfg = CoreConfig::new(PathBuf::from("slot_data"), SlotTemplate::standard())
            .expect("valid config");
        assert_eq!(cfg.slot_data_dir(), Path::new("slot_data"));
        assert_eq!(cfg.template().len(), 9);
    }
}
