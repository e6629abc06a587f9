//! Dedup ledger
//!
//! Persisted set of fixture ids already alerted on. Enforces at-most-once
//! notification per fixture across cycles and process restarts. Entries are
//! never removed: fixtures do not recur with the same id.

use crate::error::{BotError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

pub struct AlertLedger {
    path: Option<PathBuf>,
    seen: HashSet<u64>,
}

impl AlertLedger {
    /// Load persisted state. A missing or unreadable file starts the ledger
    /// empty — absence is not an error, only logged.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let seen = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<u64>>(&raw) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!("ledger file {} unreadable, starting empty: {}", path.display(), e);
                    HashSet::new()
                }
            },
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!("ledger file {} unreadable, starting empty: {}", path.display(), e);
                }
                HashSet::new()
            }
        };

        Self {
            path: Some(path),
            seen,
        }
    }

    /// Ledger with no backing file; `flush` is a no-op. For tests and
    /// one-shot runs.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            seen: HashSet::new(),
        }
    }

    pub fn contains(&self, fixture_id: u64) -> bool {
        self.seen.contains(&fixture_id)
    }

    /// Idempotent: marking twice has the same effect as once. Returns
    /// whether the id was newly recorded.
    pub fn mark(&mut self, fixture_id: u64) -> bool {
        self.seen.insert(fixture_id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Overwrite persisted state with the full current set.
    ///
    /// Writes to a sibling temp file and renames over the target so a
    /// subsequent `load` never observes a partial write.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| BotError::Ledger {
                path: path.display().to_string(),
                source,
            })?;
        }

        let mut ids: Vec<u64> = self.seen.iter().copied().collect();
        ids.sort_unstable();
        let json = serde_json::to_string(&ids)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| BotError::Ledger {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| BotError::Ledger {
            path: path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}
